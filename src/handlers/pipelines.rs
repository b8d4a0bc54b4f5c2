// src/handlers/pipelines.rs

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
    models::pipeline::{CreatePipelinePayload, Pipeline, UpdatePipelinePayload},
};

// POST /api/pipelines
#[utoipa::path(
    post,
    path = "/api/pipelines",
    tag = "Pipelines",
    request_body = CreatePipelinePayload,
    responses(
        (status = 201, description = "Pipeline criado", body = Pipeline),
        (status = 422, description = "Definição de estágios inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_pipeline(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreatePipelinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, payload.client_id)?;

    let pipeline = app_state.pipeline_service.create(client_id, payload).await?;
    Ok((StatusCode::CREATED, Json(pipeline)))
}

// GET /api/pipelines
#[utoipa::path(
    get,
    path = "/api/pipelines",
    tag = "Pipelines",
    params(ScopeQuery),
    responses(
        (status = 200, description = "Pipelines do tenant", body = Vec<Pipeline>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_pipelines(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    let pipelines = app_state.pipeline_service.list(client_id).await?;
    Ok(Json(pipelines))
}

// GET /api/pipelines/{id}
#[utoipa::path(
    get,
    path = "/api/pipelines/{id}",
    tag = "Pipelines",
    params(("id" = Uuid, Path, description = "ID do pipeline"), ScopeQuery),
    responses(
        (status = 200, description = "Pipeline", body = Pipeline),
        (status = 404, description = "Pipeline não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_pipeline(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    let pipeline = app_state.pipeline_service.get(client_id, id).await?;
    Ok(Json(pipeline))
}

// PATCH /api/pipelines/{id}
#[utoipa::path(
    patch,
    path = "/api/pipelines/{id}",
    tag = "Pipelines",
    params(("id" = Uuid, Path, description = "ID do pipeline"), ScopeQuery),
    request_body = UpdatePipelinePayload,
    responses(
        (status = 200, description = "Pipeline atualizado", body = Pipeline),
        (status = 404, description = "Pipeline não encontrado"),
        (status = 422, description = "Definição de estágios inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_pipeline(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
    Json(payload): Json<UpdatePipelinePayload>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    let pipeline = app_state.pipeline_service.update(client_id, id, payload).await?;
    Ok(Json(pipeline))
}
