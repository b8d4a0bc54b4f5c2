// src/services/lead_service.rs

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LeadRepository, PipelineRepository},
    models::{
        lead::{CreateLeadPayload, Lead, StageHistory, UpdateLeadPayload},
        pipeline::{FieldType, PipelineCustomField, PipelineStage},
    },
};

#[derive(Clone)]
pub struct LeadService {
    lead_repo: LeadRepository,
    pipeline_repo: PipelineRepository,
    pool: PgPool,
}

impl LeadService {
    pub fn new(lead_repo: LeadRepository, pipeline_repo: PipelineRepository, pool: PgPool) -> Self {
        Self { lead_repo, pipeline_repo, pool }
    }

    pub async fn create(
        &self,
        client_id: Uuid,
        created_by_id: Option<Uuid>,
        payload: CreateLeadPayload,
    ) -> Result<Lead, AppError> {
        let pipeline = self
            .pipeline_repo
            .find_by_id(client_id, payload.pipeline_id)
            .await?
            .ok_or(AppError::NotFound("Pipeline"))?;

        let stages = pipeline.parse_stages();

        // current_stage é uma chave string, não FK: validamos aqui em TODA
        // escrita para o banco nunca receber um estágio órfão.
        let stage = match payload.current_stage.as_deref() {
            Some(key) => resolve_stage(&stages, key)?.id.clone(),
            None => default_stage(&stages)
                .ok_or(AppError::InvalidPipeline(
                    "Pipeline sem estágios não pode receber leads".to_string(),
                ))?
                .id
                .clone(),
        };

        validate_custom_data(&pipeline.parse_custom_fields(), &payload.custom_data)?;

        let lead_date = payload.lead_date.unwrap_or_else(today);

        let lead = self
            .lead_repo
            .insert(
                &self.pool,
                client_id,
                &payload.customer_name,
                &payload.phone,
                payload.email.as_deref(),
                pipeline.id,
                &stage,
                payload.campaign_id,
                payload.campaign_name.as_deref(),
                payload.value,
                &payload.custom_data,
                created_by_id,
                lead_date,
            )
            .await?;

        tracing::info!("✅ Lead '{}' criado no estágio '{}'", lead.customer_name, lead.current_stage);
        Ok(lead)
    }

    pub async fn list(
        &self,
        client_id: Uuid,
        pipeline_id: Option<Uuid>,
    ) -> Result<Vec<Lead>, AppError> {
        self.lead_repo.list(client_id, pipeline_id).await
    }

    pub async fn get(&self, client_id: Uuid, id: Uuid) -> Result<Lead, AppError> {
        self.lead_repo
            .find_by_id(client_id, id)
            .await?
            .ok_or(AppError::NotFound("Lead"))
    }

    pub async fn update(
        &self,
        client_id: Uuid,
        id: Uuid,
        payload: UpdateLeadPayload,
    ) -> Result<Lead, AppError> {
        // Edição de custom_data revalida contra os campos do pipeline dono.
        if let Some(custom_data) = &payload.custom_data {
            let lead = self.get(client_id, id).await?;
            let pipeline = self
                .pipeline_repo
                .find_by_id(client_id, lead.pipeline_id)
                .await?
                .ok_or(AppError::NotFound("Pipeline"))?;
            validate_custom_data(&pipeline.parse_custom_fields(), custom_data)?;
        }

        self.lead_repo
            .update(
                client_id,
                id,
                payload.customer_name.as_deref(),
                payload.phone.as_deref(),
                payload.email.as_deref(),
                payload.campaign_id,
                payload.value,
                payload.custom_data.as_ref(),
            )
            .await?
            .ok_or(AppError::NotFound("Lead"))
    }

    /// Move o lead para outro estágio do MESMO pipeline, gravando a trilha
    /// em stage_history na mesma transação.
    pub async fn transition_stage(
        &self,
        client_id: Uuid,
        lead_id: Uuid,
        to_stage: &str,
        changed_by_id: Option<Uuid>,
    ) -> Result<Lead, AppError> {
        let lead = self.get(client_id, lead_id).await?;

        let pipeline = self
            .pipeline_repo
            .find_by_id(client_id, lead.pipeline_id)
            .await?
            .ok_or(AppError::NotFound("Pipeline"))?;

        let stages = pipeline.parse_stages();
        let target = resolve_stage(&stages, to_stage)?;

        // Transição para o próprio estágio é um no-op sem histórico.
        if lead.current_stage == target.id {
            return Ok(lead);
        }

        let mut tx = self.pool.begin().await?;

        let updated = self
            .lead_repo
            .set_stage(&mut *tx, client_id, lead_id, &target.id)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        self.lead_repo
            .insert_stage_history(&mut *tx, lead_id, &lead.current_stage, &target.id, changed_by_id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🔀 Lead {} movido de '{}' para '{}'",
            lead_id,
            lead.current_stage,
            target.id
        );
        Ok(updated)
    }

    pub async fn stage_history(
        &self,
        client_id: Uuid,
        lead_id: Uuid,
    ) -> Result<Vec<StageHistory>, AppError> {
        // Confere o tenant antes de expor a trilha.
        self.get(client_id, lead_id).await?;
        self.lead_repo.stage_history(lead_id).await
    }

    pub async fn delete(&self, client_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let affected = self.lead_repo.delete(client_id, id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Lead"));
        }
        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// =============================================================================
//  RESOLUÇÃO DE ESTÁGIO E VALIDAÇÃO DE CUSTOM_DATA
// =============================================================================

/// Primeiro estágio do funil (menor `order`).
pub fn default_stage(stages: &[PipelineStage]) -> Option<&PipelineStage> {
    stages.iter().min_by_key(|s| s.order)
}

pub fn resolve_stage<'a>(
    stages: &'a [PipelineStage],
    key: &str,
) -> Result<&'a PipelineStage, AppError> {
    stages
        .iter()
        .find(|s| s.id == key)
        .ok_or(AppError::NotFound("Estágio"))
}

/// Motor de validação dinâmica: cada campo customizado do pipeline é
/// checado por obrigatoriedade e tipo. Erros saem como mapa
/// chave -> código ("required", "invalid_number"...), nunca como frase.
pub fn validate_custom_data(
    fields: &[PipelineCustomField],
    data: &Value,
) -> Result<(), AppError> {
    // Null equivale a objeto vazio; qualquer outro não-objeto é payload malformado.
    let empty = serde_json::Map::new();
    let obj = match data {
        Value::Null => &empty,
        other => other.as_object().ok_or(AppError::CustomDataJson)?,
    };

    let mut errors: HashMap<String, String> = HashMap::new();

    for field in fields {
        let value = obj.get(&field.id);

        if field.required && value.is_none_or(|v| v.is_null()) {
            errors.insert(field.id.clone(), "required".to_string());
            continue;
        }

        if let Some(val) = value {
            if !val.is_null() {
                let valid = match field.field_type {
                    FieldType::Number => val.is_number(),
                    FieldType::Boolean => val.is_boolean(),
                    FieldType::Multiselect => val.is_array(),
                    FieldType::Text | FieldType::Select => val.is_string(),
                    FieldType::Date => val
                        .as_str()
                        .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
                };

                if !valid {
                    let error_code = match field.field_type {
                        FieldType::Number => "invalid_number",
                        FieldType::Date => "invalid_date_format",
                        FieldType::Boolean => "invalid_boolean",
                        FieldType::Multiselect => "invalid_list",
                        _ => "invalid_text",
                    };
                    errors.insert(field.id.clone(), error_code.to_string());
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(AppError::CustomDataValidationError(errors));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stage(id: &str, order: i32) -> PipelineStage {
        PipelineStage {
            id: id.to_string(),
            name: id.to_string(),
            color: "#000000".to_string(),
            order,
            is_goal: false,
        }
    }

    fn field(id: &str, field_type: FieldType, required: bool) -> PipelineCustomField {
        PipelineCustomField {
            id: id.to_string(),
            name: id.to_string(),
            field_type,
            options: None,
            required,
        }
    }

    #[test]
    fn estagio_padrao_e_o_de_menor_ordem() {
        let stages = vec![stage("won", 2), stage("new", 0), stage("qualified", 1)];
        assert_eq!(default_stage(&stages).unwrap().id, "new");
    }

    #[test]
    fn estagio_desconhecido_e_rejeitado() {
        let stages = vec![stage("new", 0)];
        assert!(resolve_stage(&stages, "inexistente").is_err());
        assert!(resolve_stage(&stages, "new").is_ok());
    }

    #[test]
    fn campo_obrigatorio_ausente_gera_codigo_required() {
        let fields = vec![field("orcamento", FieldType::Number, true)];
        let err = validate_custom_data(&fields, &json!({})).unwrap_err();
        match err {
            AppError::CustomDataValidationError(details) => {
                assert_eq!(details.get("orcamento").map(String::as_str), Some("required"));
            }
            other => panic!("erro inesperado: {:?}", other),
        }
    }

    #[test]
    fn tipo_errado_gera_codigo_do_tipo() {
        let fields = vec![
            field("orcamento", FieldType::Number, false),
            field("retorno", FieldType::Date, false),
        ];
        let data = json!({ "orcamento": "cinco mil", "retorno": "31/12/2024" });
        let err = validate_custom_data(&fields, &data).unwrap_err();
        match err {
            AppError::CustomDataValidationError(details) => {
                assert_eq!(details.get("orcamento").map(String::as_str), Some("invalid_number"));
                assert_eq!(
                    details.get("retorno").map(String::as_str),
                    Some("invalid_date_format")
                );
            }
            other => panic!("erro inesperado: {:?}", other),
        }
    }

    #[test]
    fn dados_validos_passam() {
        let fields = vec![
            field("orcamento", FieldType::Number, true),
            field("retorno", FieldType::Date, false),
            field("tags", FieldType::Multiselect, false),
        ];
        let data = json!({ "orcamento": 5000, "retorno": "2024-12-31", "tags": ["quente"] });
        assert!(validate_custom_data(&fields, &data).is_ok());
    }

    #[test]
    fn custom_data_nao_objeto_e_rejeitado() {
        assert!(matches!(
            validate_custom_data(&[], &json!([1, 2])),
            Err(AppError::CustomDataJson)
        ));
    }

    #[test]
    fn payload_sem_custom_data_passa_em_pipeline_sem_campos() {
        // Omitir customData no POST não pode reprovar o lead.
        let payload: CreateLeadPayload = serde_json::from_value(json!({
            "customerName": "Maria da Silva",
            "phone": "+55 11 91234-5678",
            "pipelineId": "8f3c2a1e-0000-4000-8000-000000000001"
        }))
        .unwrap();

        assert!(payload.custom_data.is_object());
        assert!(validate_custom_data(&[], &payload.custom_data).is_ok());
    }

    #[test]
    fn custom_data_null_equivale_a_objeto_vazio() {
        assert!(validate_custom_data(&[], &Value::Null).is_ok());

        // Campo obrigatório continua cobrando presença.
        let fields = vec![field("orcamento", FieldType::Number, true)];
        assert!(matches!(
            validate_custom_data(&fields, &Value::Null),
            Err(AppError::CustomDataValidationError(_))
        ));
    }
}
