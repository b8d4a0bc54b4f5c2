// src/models/spend.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::campaign::Platform;

// Uma linha = uma observação (campanha, data, plataforma) de métricas de anúncio.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpendLog {
    pub id: Uuid,
    pub client_id: Uuid,

    pub date: NaiveDate,

    // Nullable: linhas podem existir antes da resolução de identidade.
    pub campaign_id: Option<Uuid>,
    // Snapshot desnormalizado; as visões por campanha se apoiam nele,
    // não no FK.
    pub campaign_name: String,

    pub platform: Platform,

    pub spend: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub reach: i64,

    // Agrupa as linhas de uma mesma operação de importação.
    pub import_batch_id: Option<String>,

    // Linha original da planilha, preservada para auditoria/debug.
    pub raw_data: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Entrada manual de um spend log.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpendLogPayload {
    pub client_id: Option<Uuid>,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub date: NaiveDate,

    #[validate(length(min = 1, message = "required"))]
    pub campaign_name: String,

    pub platform: Option<Platform>,

    #[validate(range(min = 0.0, message = "spend não pode ser negativo"))]
    #[schema(value_type = f64, example = 150000.50)]
    pub spend: f64,

    #[validate(range(min = 0, message = "impressions não pode ser negativo"))]
    #[serde(default)]
    pub impressions: i64,

    #[validate(range(min = 0, message = "clicks não pode ser negativo"))]
    #[serde(default)]
    pub clicks: i64,

    #[validate(range(min = 0, message = "reach não pode ser negativo"))]
    #[serde(default)]
    pub reach: i64,
}

// Edição inline: corrige um campo de cada vez, todos opcionais.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpendLogPayload {
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub platform: Option<Platform>,
    pub campaign_id: Option<Uuid>,
    #[validate(range(min = 0.0, message = "spend não pode ser negativo"))]
    #[schema(value_type = Option<f64>)]
    pub spend: Option<f64>,
    #[validate(range(min = 0, message = "impressions não pode ser negativo"))]
    pub impressions: Option<i64>,
    #[validate(range(min = 0, message = "clicks não pode ser negativo"))]
    pub clicks: Option<i64>,
    #[validate(range(min = 0, message = "reach não pode ser negativo"))]
    pub reach: Option<i64>,
}
