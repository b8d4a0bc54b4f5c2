// src/handlers/analytics.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        tenancy::{resolve_client_scope, ScopeQuery},
    },
    models::analytics::{
        AnalyticsQuery, AnalyticsResponse, DashboardConfig, UpdateDashboardConfigPayload,
    },
};

// GET /api/analytics — métricas, séries mensais e quebra por campanha
#[utoipa::path(
    get,
    path = "/api/analytics",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Visão agregada do tenant no período", body = AnalyticsResponse),
        (status = 400, description = "clientId ausente (SUPER_ADMIN)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_analytics(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, query.client_id)?;

    let response = app_state
        .analytics_service
        .get_analytics(client_id, query.start_date, query.end_date, query.platform)
        .await?;

    Ok(Json(response))
}

// GET /api/analytics/dashboard-config — métricas visíveis do tenant
#[utoipa::path(
    get,
    path = "/api/analytics/dashboard-config",
    tag = "Analytics",
    params(ScopeQuery),
    responses(
        (status = 200, description = "Config de dashboard do cliente", body = DashboardConfig)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard_config(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;

    let config = app_state.dashboard_service.get_or_create(client_id).await?;

    Ok(Json(config))
}

// PUT /api/analytics/dashboard-config — personaliza as métricas visíveis
#[utoipa::path(
    put,
    path = "/api/analytics/dashboard-config",
    tag = "Analytics",
    request_body = UpdateDashboardConfigPayload,
    responses(
        (status = 200, description = "Config de dashboard atualizada", body = DashboardConfig)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_dashboard_config(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateDashboardConfigPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, payload.client_id)?;

    let config = app_state
        .dashboard_service
        .update_metrics(client_id, payload.metrics)
        .await?;

    Ok(Json(config))
}
