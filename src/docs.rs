// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,

        // --- Campaigns ---
        handlers::campaigns::create_campaign,
        handlers::campaigns::list_campaigns,
        handlers::campaigns::update_campaign,
        handlers::campaigns::delete_campaign,
        handlers::campaigns::merge_campaigns,

        // --- Spend ---
        handlers::spend::create_spend_log,
        handlers::spend::list_spend_logs,
        handlers::spend::update_spend_log,
        handlers::spend::delete_spend_log,

        // --- Import ---
        handlers::imports::validate_columns,
        handlers::imports::detect_columns,
        handlers::imports::import_spend,
        handlers::imports::import_leads,

        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_leads,
        handlers::leads::update_lead,
        handlers::leads::transition_stage,
        handlers::leads::lead_history,
        handlers::leads::delete_lead,

        // --- Pipelines ---
        handlers::pipelines::create_pipeline,
        handlers::pipelines::list_pipelines,
        handlers::pipelines::get_pipeline,
        handlers::pipelines::update_pipeline,

        // --- Analytics ---
        handlers::analytics::get_analytics,
        handlers::analytics::get_dashboard_config,
        handlers::analytics::update_dashboard_config,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Clients ---
            models::client::Client,
            models::client::CreateClientPayload,

            // --- Campaigns ---
            models::campaign::Platform,
            models::campaign::Campaign,
            models::campaign::CampaignWithCounts,
            models::campaign::CreateCampaignPayload,
            models::campaign::UpdateCampaignPayload,
            models::campaign::MergeCampaignsPayload,

            // --- Spend ---
            models::spend::SpendLog,
            models::spend::CreateSpendLogPayload,
            models::spend::UpdateSpendLogPayload,

            // --- Import ---
            models::import::ImportSpendPayload,
            models::import::ImportSummary,
            models::import::ImportLeadsPayload,
            models::import::ImportLeadsSummary,
            models::import::ValidateColumnsPayload,
            models::import::ValidateColumnsResponse,
            models::import::MappedHeader,
            models::import::DetectColumnsPayload,

            // --- Leads ---
            models::lead::Lead,
            models::lead::StageHistory,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,
            models::lead::TransitionStagePayload,

            // --- Pipelines ---
            models::pipeline::FieldType,
            models::pipeline::PipelineStage,
            models::pipeline::PipelineCustomField,
            models::pipeline::Pipeline,
            models::pipeline::CreatePipelinePayload,
            models::pipeline::UpdatePipelinePayload,

            // --- Analytics ---
            models::analytics::MetricsSummary,
            models::analytics::MonthlyPoint,
            models::analytics::CampaignBreakdownEntry,
            models::analytics::AnalyticsCharts,
            models::analytics::AnalyticsResponse,
            models::analytics::DashboardConfig,
            models::analytics::UpdateDashboardConfigPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Clients", description = "Gestão de Clients (tenants)"),
        (name = "Campaigns", description = "Identidade e Merge de Campanhas"),
        (name = "Spend", description = "Spend Logs (métricas diárias de anúncio)"),
        (name = "Import", description = "Importação de Planilhas"),
        (name = "Leads", description = "CRM de Leads e Funil"),
        (name = "Pipelines", description = "Pipelines, Estágios e Campos Customizados"),
        (name = "Analytics", description = "Métricas Derivadas e Dashboard")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
