//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas)
    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let client_routes = Router::new().route(
        "/",
        post(handlers::clients::create_client).get(handlers::clients::list_clients),
    );

    let campaign_routes = Router::new()
        .route(
            "/",
            post(handlers::campaigns::create_campaign).get(handlers::campaigns::list_campaigns),
        )
        .route(
            "/{id}",
            axum::routing::patch(handlers::campaigns::update_campaign)
                .delete(handlers::campaigns::delete_campaign),
        )
        .route("/merge", post(handlers::campaigns::merge_campaigns));

    let spend_routes = Router::new()
        .route(
            "/",
            post(handlers::spend::create_spend_log).get(handlers::spend::list_spend_logs),
        )
        .route(
            "/{id}",
            axum::routing::patch(handlers::spend::update_spend_log)
                .delete(handlers::spend::delete_spend_log),
        );

    let import_routes = Router::new()
        .route("/spend", post(handlers::imports::import_spend))
        .route("/leads", post(handlers::imports::import_leads))
        .route("/validate-columns", post(handlers::imports::validate_columns))
        .route("/detect-columns", post(handlers::imports::detect_columns));

    let lead_routes = Router::new()
        .route("/", post(handlers::leads::create_lead).get(handlers::leads::list_leads))
        .route(
            "/{id}",
            axum::routing::patch(handlers::leads::update_lead)
                .delete(handlers::leads::delete_lead),
        )
        .route("/{id}/stage", post(handlers::leads::transition_stage))
        .route("/{id}/history", get(handlers::leads::lead_history));

    let pipeline_routes = Router::new()
        .route(
            "/",
            post(handlers::pipelines::create_pipeline).get(handlers::pipelines::list_pipelines),
        )
        .route(
            "/{id}",
            get(handlers::pipelines::get_pipeline)
                .patch(handlers::pipelines::update_pipeline),
        );

    let analytics_routes = Router::new()
        .route("/", get(handlers::analytics::get_analytics))
        .route(
            "/dashboard-config",
            get(handlers::analytics::get_dashboard_config)
                .put(handlers::analytics::update_dashboard_config),
        );

    // Tudo que não é auth/health passa pelo guard de autenticação
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/campaigns", campaign_routes)
        .nest("/api/spend", spend_routes)
        .nest("/api/import", import_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/pipelines", pipeline_routes)
        .nest("/api/analytics", analytics_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().expect("addr"));
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
