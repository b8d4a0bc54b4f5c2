// src/db/pipeline_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::pipeline::Pipeline};

#[derive(Clone)]
pub struct PipelineRepository {
    pool: PgPool,
}

impl PipelineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        name: &str,
        stages: &Value,
        custom_fields: &Value,
        is_default: bool,
    ) -> Result<Pipeline, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pipeline = sqlx::query_as::<_, Pipeline>(
            r#"
            INSERT INTO pipelines (client_id, name, stages, custom_fields, is_default)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(name)
        .bind(stages)
        .bind(custom_fields)
        .bind(is_default)
        .fetch_one(executor)
        .await?;
        Ok(pipeline)
    }

    pub async fn find_by_id(&self, client_id: Uuid, id: Uuid) -> Result<Option<Pipeline>, AppError> {
        let pipeline = sqlx::query_as::<_, Pipeline>(
            "SELECT * FROM pipelines WHERE id = $1 AND client_id = $2",
        )
        .bind(id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pipeline)
    }

    pub async fn list(&self, client_id: Uuid) -> Result<Vec<Pipeline>, AppError> {
        let pipelines = sqlx::query_as::<_, Pipeline>(
            "SELECT * FROM pipelines WHERE client_id = $1 ORDER BY created_at ASC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pipelines)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        stages: Option<&Value>,
        custom_fields: Option<&Value>,
        is_default: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<Option<Pipeline>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pipeline = sqlx::query_as::<_, Pipeline>(
            r#"
            UPDATE pipelines
            SET name = COALESCE($3, name),
                stages = COALESCE($4, stages),
                custom_fields = COALESCE($5, custom_fields),
                is_default = COALESCE($6, is_default),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1 AND client_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id)
        .bind(name)
        .bind(stages)
        .bind(custom_fields)
        .bind(is_default)
        .bind(is_active)
        .fetch_optional(executor)
        .await?;
        Ok(pipeline)
    }

    /// Derruba a flag is_default das demais pipelines do tenant.
    /// Chamado dentro da mesma transação que promove a nova default,
    /// para manter no máximo uma default por client.
    pub async fn clear_default_except<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        keep_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE pipelines SET is_default = FALSE, updated_at = NOW() \
             WHERE client_id = $1 AND id <> $2 AND is_default = TRUE",
        )
        .bind(client_id)
        .bind(keep_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
