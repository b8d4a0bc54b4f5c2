// src/services/pipeline_service.rs

use std::collections::HashSet;

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PipelineRepository,
    models::pipeline::{CreatePipelinePayload, Pipeline, PipelineCustomField, PipelineStage,
        UpdatePipelinePayload},
};

#[derive(Clone)]
pub struct PipelineService {
    repo: PipelineRepository,
    pool: PgPool,
}

impl PipelineService {
    pub fn new(repo: PipelineRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create(
        &self,
        client_id: Uuid,
        payload: CreatePipelinePayload,
    ) -> Result<Pipeline, AppError> {
        validate_stage_definitions(&payload.stages)?;
        validate_custom_field_definitions(&payload.custom_fields)?;

        // Promoção a default e rebaixamento das demais acontecem na MESMA
        // transação: nunca existe momento com duas defaults visíveis.
        let mut tx = self.pool.begin().await?;

        let pipeline = self
            .repo
            .insert(
                &mut *tx,
                client_id,
                &payload.name,
                &json!(payload.stages),
                &json!(payload.custom_fields),
                payload.is_default,
            )
            .await?;

        if pipeline.is_default {
            self.repo.clear_default_except(&mut *tx, client_id, pipeline.id).await?;
        }

        tx.commit().await?;

        tracing::info!("✅ Pipeline '{}' criado para client {}", pipeline.name, client_id);
        Ok(pipeline)
    }

    pub async fn list(&self, client_id: Uuid) -> Result<Vec<Pipeline>, AppError> {
        self.repo.list(client_id).await
    }

    pub async fn get(&self, client_id: Uuid, id: Uuid) -> Result<Pipeline, AppError> {
        self.repo
            .find_by_id(client_id, id)
            .await?
            .ok_or(AppError::NotFound("Pipeline"))
    }

    pub async fn update(
        &self,
        client_id: Uuid,
        id: Uuid,
        payload: UpdatePipelinePayload,
    ) -> Result<Pipeline, AppError> {
        if let Some(stages) = &payload.stages {
            validate_stage_definitions(stages)?;
        }
        if let Some(fields) = &payload.custom_fields {
            validate_custom_field_definitions(fields)?;
        }

        let stages_json = payload.stages.as_ref().map(|s| json!(s));
        let fields_json = payload.custom_fields.as_ref().map(|f| json!(f));

        let mut tx = self.pool.begin().await?;

        let pipeline = self
            .repo
            .update(
                &mut *tx,
                client_id,
                id,
                payload.name.as_deref(),
                stages_json.as_ref(),
                fields_json.as_ref(),
                payload.is_default,
                payload.is_active,
            )
            .await?
            .ok_or(AppError::NotFound("Pipeline"))?;

        if payload.is_default == Some(true) {
            self.repo.clear_default_except(&mut *tx, client_id, pipeline.id).await?;
        }

        tx.commit().await?;
        Ok(pipeline)
    }
}

// =============================================================================
//  VALIDAÇÃO DAS DEFINIÇÕES EMBUTIDAS
// =============================================================================

/// Um pipeline precisa de pelo menos um estágio, e os ids (que viram a
/// chave `current_stage` dos leads) não podem se repetir nem ser vazios.
pub fn validate_stage_definitions(stages: &[PipelineStage]) -> Result<(), AppError> {
    if stages.is_empty() {
        return Err(AppError::InvalidPipeline(
            "Pipeline precisa de pelo menos um estágio".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for stage in stages {
        if stage.id.trim().is_empty() {
            return Err(AppError::InvalidPipeline("Estágio com id vazio".to_string()));
        }
        if !seen.insert(stage.id.as_str()) {
            return Err(AppError::InvalidPipeline(format!(
                "Id de estágio duplicado: '{}'",
                stage.id
            )));
        }
    }
    Ok(())
}

pub fn validate_custom_field_definitions(
    fields: &[PipelineCustomField],
) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.id.trim().is_empty() {
            return Err(AppError::InvalidPipeline("Campo customizado com id vazio".to_string()));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(AppError::InvalidPipeline(format!(
                "Id de campo customizado duplicado: '{}'",
                field.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pipeline::FieldType;

    fn stage(id: &str, order: i32) -> PipelineStage {
        PipelineStage {
            id: id.to_string(),
            name: id.to_string(),
            color: "#000000".to_string(),
            order,
            is_goal: false,
        }
    }

    #[test]
    fn pipeline_sem_estagios_e_rejeitado() {
        assert!(validate_stage_definitions(&[]).is_err());
    }

    #[test]
    fn ids_de_estagio_duplicados_sao_rejeitados() {
        let stages = vec![stage("new", 0), stage("won", 1), stage("new", 2)];
        assert!(validate_stage_definitions(&stages).is_err());
    }

    #[test]
    fn estagios_validos_passam() {
        let stages = vec![stage("new", 0), stage("qualified", 1), stage("won", 2)];
        assert!(validate_stage_definitions(&stages).is_ok());
    }

    #[test]
    fn campos_customizados_duplicados_sao_rejeitados() {
        let field = PipelineCustomField {
            id: "orcamento".to_string(),
            name: "Orçamento".to_string(),
            field_type: FieldType::Number,
            options: None,
            required: false,
        };
        let fields = vec![field.clone(), field];
        assert!(validate_custom_field_definitions(&fields).is_err());
    }
}
