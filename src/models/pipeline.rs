// src/models/pipeline.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUM DE TIPO DE CAMPO ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    Multiselect,
}

// --- ESTÁGIOS E CAMPOS EMBUTIDOS ---
// Guardados como JSONB dentro do pipeline, não como tabelas próprias.
// A integridade referencial de `Lead.current_stage` é responsabilidade
// da aplicação (ver services/lead_service.rs).

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStage {
    #[schema(example = "new")]
    pub id: String,
    #[schema(example = "Novo Lead")]
    pub name: String,
    #[schema(example = "#4f46e5")]
    pub color: String,
    pub order: i32,
    // Estágio "meta" do funil (ex.: Fechado/Ganho).
    #[serde(default)]
    pub is_goal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineCustomField {
    #[schema(example = "orcamento")]
    pub id: String,
    #[schema(example = "Orçamento")]
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    // Opções para SELECT/MULTISELECT.
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

// --- PIPELINE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,

    // JSON bruto do banco; use `parse_stages`/`parse_custom_fields`
    // para a forma tipada.
    pub stages: Value,
    pub custom_fields: Value,

    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pipeline {
    pub fn parse_stages(&self) -> Vec<PipelineStage> {
        serde_json::from_value(self.stages.clone()).unwrap_or_default()
    }

    pub fn parse_custom_fields(&self) -> Vec<PipelineCustomField> {
        serde_json::from_value(self.custom_fields.clone()).unwrap_or_default()
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelinePayload {
    pub client_id: Option<Uuid>,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Funil de Vendas")]
    pub name: String,

    pub stages: Vec<PipelineStage>,

    #[serde(default)]
    pub custom_fields: Vec<PipelineCustomField>,

    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePipelinePayload {
    pub name: Option<String>,
    pub stages: Option<Vec<PipelineStage>>,
    pub custom_fields: Option<Vec<PipelineCustomField>>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}
