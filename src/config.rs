// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        AnalyticsRepository, CampaignRepository, ClientRepository, DashboardRepository,
        LeadRepository, PipelineRepository, SpendRepository, UserRepository,
    },
    services::{
        AnalyticsService, AuthService, CampaignService, ClientService, DashboardService,
        ImportService, LeadService, PipelineService, SpendService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub campaign_service: CampaignService,
    pub spend_service: SpendService,
    pub import_service: ImportService,
    pub lead_service: LeadService,
    pub pipeline_service: PipelineService,
    pub analytics_service: AnalyticsService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // Carrega as configurações, abre o pool e monta o grafo de serviços
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let db_pool = match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
                pool
            }
            Err(e) => {
                tracing::error!("🔥 Falha ao conectar ao banco de dados: {:?}", e);
                return Err(e.into());
            }
        };

        // --- REPOSITÓRIOS ---
        let user_repo = UserRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let campaign_repo = CampaignRepository::new(db_pool.clone());
        let spend_repo = SpendRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let pipeline_repo = PipelineRepository::new(db_pool.clone());
        let analytics_repo = AnalyticsRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        // --- SERVIÇOS ---
        let auth_service = AuthService::new(
            user_repo,
            client_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let client_service = ClientService::new(client_repo, db_pool.clone());
        let campaign_service = CampaignService::new(
            campaign_repo,
            spend_repo.clone(),
            lead_repo.clone(),
            db_pool.clone(),
        );
        let spend_service = SpendService::new(spend_repo.clone(), campaign_service.clone());
        let import_service = ImportService::new(
            spend_repo,
            lead_repo.clone(),
            pipeline_repo.clone(),
            campaign_service.clone(),
            db_pool.clone(),
        );
        let lead_service = LeadService::new(lead_repo, pipeline_repo.clone(), db_pool.clone());
        let pipeline_service = PipelineService::new(pipeline_repo, db_pool.clone());
        let dashboard_service = DashboardService::new(dashboard_repo);
        let analytics_service =
            AnalyticsService::new(analytics_repo, dashboard_service.clone());

        Ok(Self {
            db_pool,
            auth_service,
            client_service,
            campaign_service,
            spend_service,
            import_service,
            lead_service,
            pipeline_service,
            analytics_service,
            dashboard_service,
        })
    }
}
