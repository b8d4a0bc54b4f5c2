// src/handlers/imports.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::resolve_client_scope},
    models::import::{
        DetectColumnsPayload, ImportLeadsPayload, ImportLeadsSummary, ImportSpendPayload,
        ImportSummary, MappedHeader, ValidateColumnsPayload, ValidateColumnsResponse,
    },
    services::column_mapper,
};

// POST /api/import/validate-columns — portão anti-lixo, roda ANTES do upload
#[utoipa::path(
    post,
    path = "/api/import/validate-columns",
    tag = "Import",
    request_body = ValidateColumnsPayload,
    responses(
        (status = 200, description = "Cabeçalhos aceitos, mapeamento retornado", body = ValidateColumnsResponse),
        (status = 422, description = "A planilha não parece um relatório de anúncios suportado")
    ),
    security(("api_jwt" = []))
)]
pub async fn validate_columns(
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(payload): Json<ValidateColumnsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let mapping = column_mapper::validate_headers(&payload.headers)?;
    Ok(Json(mapping_response(&mapping, true)))
}

// POST /api/import/detect-columns — sugestão de mapeamento, sem portão
#[utoipa::path(
    post,
    path = "/api/import/detect-columns",
    tag = "Import",
    request_body = DetectColumnsPayload,
    responses(
        (status = 200, description = "Melhor mapeamento encontrado (pode ser parcial)", body = ValidateColumnsResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn detect_columns(
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(payload): Json<DetectColumnsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let mapping = column_mapper::detect_columns(&payload.headers, payload.platform);
    Ok(Json(mapping_response(&mapping, false)))
}

// POST /api/import/spend — ingestão de linhas de spend (sucesso parcial)
#[utoipa::path(
    post,
    path = "/api/import/spend",
    tag = "Import",
    request_body = ImportSpendPayload,
    responses(
        (status = 200, description = "Batch processado; contadores de sucesso/pulo", body = ImportSummary),
        (status = 422, description = "Colunas não reconhecidas")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_spend(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ImportSpendPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, payload.client_id)?;

    let summary = app_state
        .import_service
        .import_spend(client_id, payload.platform, &payload.rows)
        .await?;

    Ok(Json(summary))
}

// POST /api/import/leads — importação em massa, tudo-ou-nada
#[utoipa::path(
    post,
    path = "/api/import/leads",
    tag = "Import",
    request_body = ImportLeadsPayload,
    responses(
        (status = 200, description = "Leads importados", body = ImportLeadsSummary),
        (status = 400, description = "Alguma linha inválida; nada foi gravado"),
        (status = 404, description = "Pipeline não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ImportLeadsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let client_id = resolve_client_scope(&user, payload.client_id)?;

    let summary = app_state
        .import_service
        .import_leads(client_id, payload.pipeline_id, Some(user.id), &payload.rows)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

fn mapping_response(
    mapping: &column_mapper::HeaderMapping,
    accepted: bool,
) -> ValidateColumnsResponse {
    ValidateColumnsResponse {
        accepted,
        matched: mapping.matched(),
        total: mapping.total_headers,
        mapping: mapping
            .entries
            .iter()
            .map(|(header, field)| MappedHeader {
                header: header.clone(),
                field: field.key().to_string(),
            })
            .collect(),
    }
}
