// src/handlers/campaigns.rs

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
        tenancy::{require_admin, resolve_client_scope, ScopeQuery},
    },
    models::campaign::{
        Campaign, CampaignWithCounts, CreateCampaignPayload, MergeCampaignsPayload, Platform,
        UpdateCampaignPayload,
    },
};

// POST /api/campaigns
#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = "Campaigns",
    request_body = CreateCampaignPayload,
    responses(
        (status = 201, description = "Campanha criada", body = Campaign),
        (status = 409, description = "Campanha com este nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_campaign(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateCampaignPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, payload.client_id)?;

    let platform = Platform::for_manual_entry(payload.platform);
    let campaign = app_state
        .campaign_service
        .create(client_id, &payload.name, platform)
        .await?;

    Ok((StatusCode::CREATED, Json(campaign)))
}

// GET /api/campaigns
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Campaigns",
    params(ScopeQuery),
    responses(
        (status = 200, description = "Campanhas do tenant, com contagens", body = Vec<CampaignWithCounts>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_campaigns(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    let campaigns = app_state.campaign_service.list(client_id).await?;
    Ok(Json(campaigns))
}

// PATCH /api/campaigns/{id}
#[utoipa::path(
    patch,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "ID da campanha"), ScopeQuery),
    request_body = UpdateCampaignPayload,
    responses(
        (status = 200, description = "Campanha atualizada", body = Campaign),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_campaign(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
    Json(payload): Json<UpdateCampaignPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, scope.client_id)?;

    let campaign = app_state
        .campaign_service
        .update(client_id, id, payload.name.as_deref(), payload.platform, payload.is_active)
        .await?;

    Ok(Json(campaign))
}

// DELETE /api/campaigns/{id}
#[utoipa::path(
    delete,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "ID da campanha"), ScopeQuery),
    responses(
        (status = 204, description = "Campanha removida"),
        (status = 403, description = "Perfil CS não administra o catálogo"),
        (status = 404, description = "Campanha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_campaign(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(scope): Query<ScopeQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&user)?;
    let client_id = resolve_client_scope(&user, scope.client_id)?;
    app_state.campaign_service.delete(client_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/campaigns/merge
#[utoipa::path(
    post,
    path = "/api/campaigns/merge",
    tag = "Campaigns",
    request_body = MergeCampaignsPayload,
    responses(
        (status = 200, description = "Campanhas fundidas no alvo", body = CampaignWithCounts),
        (status = 403, description = "Perfil CS não administra o catálogo"),
        (status = 409, description = "Pedido de merge inválido"),
        (status = 404, description = "Alguma campanha não pertence ao tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn merge_campaigns(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<MergeCampaignsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    require_admin(&user)?;
    let client_id = resolve_client_scope(&user, payload.client_id)?;

    let merged = app_state
        .campaign_service
        .merge(client_id, payload.target_id, &payload.source_ids)
        .await?;

    Ok(Json(merged))
}
