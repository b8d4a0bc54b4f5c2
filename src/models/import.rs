// src/models/import.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::campaign::Platform;

// Corpo da importação de spend: linhas cruas da planilha já parseada
// (mapas chave string -> valor), como o parser de .xlsx/.csv entrega.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpendPayload {
    // Obrigatório para SUPER_ADMIN; para os demais perfis é validado
    // contra o tenant do chamador.
    pub client_id: Option<Uuid>,

    // Plataforma global do arquivo; um valor por linha tem precedência.
    pub platform: Option<Platform>,

    #[validate(length(min = 1, message = "Nenhuma linha para importar."))]
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Map<String, Value>>,
}

// Resultado agregado de um batch de spend. Linhas individuais podem
// falhar sem abortar o batch; o chamador enxerga os contadores.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub count: u64,
    pub skipped: u64,
    pub new_campaigns: u64,
    pub batch_id: String,
}

// Importação em massa de leads: tudo-ou-nada (uma transação).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportLeadsPayload {
    pub client_id: Option<Uuid>,
    pub pipeline_id: Uuid,

    #[validate(length(min = 1, message = "Nenhuma linha para importar."))]
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Map<String, Value>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportLeadsSummary {
    pub count: u64,
    pub batch_id: String,
}

// Pré-validação dos cabeçalhos (portão anti-lixo antes do upload).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateColumnsPayload {
    #[validate(length(min = 1, message = "Informe os cabeçalhos da planilha."))]
    pub headers: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateColumnsResponse {
    pub accepted: bool,
    pub matched: usize,
    pub total: usize,
    // header -> campo canônico
    pub mapping: Vec<MappedHeader>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappedHeader {
    pub header: String,
    pub field: String,
}

// Sugestão de mapeamento (modo auto-detect, usado pelos templates salvos).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetectColumnsPayload {
    #[validate(length(min = 1, message = "Informe os cabeçalhos da planilha."))]
    pub headers: Vec<String>,
    pub platform: Option<Platform>,
}
