// src/models/lead.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um prospecto vinculado a um client, um pipeline e um estágio pontual.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub client_id: Uuid,

    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,

    pub pipeline_id: Uuid,
    // Chave string para um estágio embutido no pipeline (não é FK).
    pub current_stage: String,

    // Atribuição de origem.
    pub campaign_id: Option<Uuid>,
    pub campaign_name: Option<String>,

    // Valor do negócio, se conhecido.
    pub value: Option<Decimal>,

    // Dados livres chaveados pelo id do campo customizado do pipeline.
    pub custom_data: Value,

    pub created_by_id: Option<Uuid>,
    pub lead_date: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Registro de transição de estágio (trilha de auditoria do funil).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageHistory {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub from_stage: String,
    pub to_stage: String,
    pub changed_by_id: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    pub client_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub customer_name: String,

    #[validate(length(min = 5, message = "Telefone muito curto"))]
    #[schema(example = "+55 11 91234-5678")]
    pub phone: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    pub pipeline_id: Uuid,

    // Se ausente, cai no primeiro estágio do pipeline.
    pub current_stage: Option<String>,

    pub campaign_id: Option<Uuid>,
    pub campaign_name: Option<String>,

    #[schema(value_type = Option<f64>)]
    pub value: Option<Decimal>,

    // Ausente vira objeto vazio (Value::default() seria Null e reprovaria
    // leads válidos em pipelines sem campos customizados).
    #[serde(default = "empty_custom_data")]
    #[schema(example = json!({"orcamento": 5000}))]
    pub custom_data: Value,

    #[schema(value_type = Option<String>, format = Date)]
    pub lead_date: Option<NaiveDate>,
}

fn empty_custom_data() -> Value {
    Value::Object(serde_json::Map::new())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub campaign_id: Option<Uuid>,
    #[schema(value_type = Option<f64>)]
    pub value: Option<Decimal>,
    pub custom_data: Option<Value>,
}

// Transição de estágio: valida o destino e grava StageHistory.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionStagePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "qualified")]
    pub to_stage: String,
}
