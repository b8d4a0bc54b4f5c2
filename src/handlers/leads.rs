// src/handlers/leads.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        tenancy::{resolve_client_scope, ScopeQuery},
    },
    models::lead::{
        CreateLeadPayload, Lead, StageHistory, TransitionStagePayload, UpdateLeadPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListLeadsQuery {
    pub client_id: Option<Uuid>,
    pub pipeline_id: Option<Uuid>,
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos (incluindo custom_data)"),
        (status = 404, description = "Pipeline ou estágio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, payload.client_id)?;

    let lead = app_state.lead_service.create(client_id, Some(user.id), payload).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(ListLeadsQuery),
    responses(
        (status = 200, description = "Leads do tenant", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListLeadsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, query.client_id)?;
    let leads = app_state.lead_service.list(client_id, query.pipeline_id).await?;
    Ok(Json(leads))
}

// PATCH /api/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead"), ScopeQuery),
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    let lead = app_state.lead_service.update(client_id, id, payload).await?;
    Ok(Json(lead))
}

// POST /api/leads/{id}/stage — transição de estágio com trilha
#[utoipa::path(
    post,
    path = "/api/leads/{id}/stage",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead"), ScopeQuery),
    request_body = TransitionStagePayload,
    responses(
        (status = 200, description = "Lead movido de estágio", body = Lead),
        (status = 404, description = "Lead ou estágio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_stage(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
    Json(payload): Json<TransitionStagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, scope.client_id)?;

    let lead = app_state
        .lead_service
        .transition_stage(client_id, id, &payload.to_stage, Some(user.id))
        .await?;

    Ok(Json(lead))
}

// GET /api/leads/{id}/history
#[utoipa::path(
    get,
    path = "/api/leads/{id}/history",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead"), ScopeQuery),
    responses(
        (status = 200, description = "Trilha de transições do lead", body = Vec<StageHistory>),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn lead_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    let history = app_state.lead_service.stage_history(client_id, id).await?;
    Ok(Json(history))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead"), ScopeQuery),
    responses(
        (status = 204, description = "Lead removido"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    app_state.lead_service.delete(client_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
