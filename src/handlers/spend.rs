// src/handlers/spend.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        tenancy::{resolve_client_scope, ScopeQuery},
    },
    models::{
        analytics::AnalyticsQuery,
        spend::{CreateSpendLogPayload, SpendLog, UpdateSpendLogPayload},
    },
};

// POST /api/spend — entrada manual de uma linha
#[utoipa::path(
    post,
    path = "/api/spend",
    tag = "Spend",
    request_body = CreateSpendLogPayload,
    responses(
        (status = 201, description = "Spend log criado", body = SpendLog),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_spend_log(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateSpendLogPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, payload.client_id)?;

    let log = app_state.spend_service.create(client_id, payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

// GET /api/spend — listagem com filtros de data/plataforma
#[utoipa::path(
    get,
    path = "/api/spend",
    tag = "Spend",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Spend logs do tenant", body = Vec<SpendLog>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_spend_logs(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, query.client_id)?;

    let logs = app_state
        .spend_service
        .list(client_id, query.start_date, query.end_date, query.platform)
        .await?;
    Ok(Json(logs))
}

// PATCH /api/spend/{id} — edição inline
#[utoipa::path(
    patch,
    path = "/api/spend/{id}",
    tag = "Spend",
    params(("id" = Uuid, Path, description = "ID do spend log"), ScopeQuery),
    request_body = UpdateSpendLogPayload,
    responses(
        (status = 200, description = "Spend log atualizado", body = SpendLog),
        (status = 404, description = "Spend log não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_spend_log(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
    Json(payload): Json<UpdateSpendLogPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, scope.client_id)?;

    let log = app_state.spend_service.update(client_id, id, payload).await?;
    Ok(Json(log))
}

// DELETE /api/spend/{id}
#[utoipa::path(
    delete,
    path = "/api/spend/{id}",
    tag = "Spend",
    params(("id" = Uuid, Path, description = "ID do spend log"), ScopeQuery),
    responses(
        (status = 204, description = "Spend log removido"),
        (status = 404, description = "Spend log não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_spend_log(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    app_state.spend_service.delete(client_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
