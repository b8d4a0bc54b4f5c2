// src/db/dashboard_repo.rs

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::analytics::DashboardConfig};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Option<DashboardConfig>, AppError> {
        let config = sqlx::query_as::<_, DashboardConfig>(
            "SELECT * FROM dashboard_configs WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(config)
    }

    /// Criação preguiçosa: se outro request criou primeiro, o ON CONFLICT
    /// devolve a linha existente em vez de falhar.
    pub async fn upsert_default(
        &self,
        client_id: Uuid,
        metrics: &Value,
    ) -> Result<DashboardConfig, AppError> {
        let config = sqlx::query_as::<_, DashboardConfig>(
            r#"
            INSERT INTO dashboard_configs (client_id, metrics)
            VALUES ($1, $2)
            ON CONFLICT (client_id) DO UPDATE SET updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(metrics)
        .fetch_one(&self.pool)
        .await?;
        Ok(config)
    }

    pub async fn update_metrics(
        &self,
        client_id: Uuid,
        metrics: &Value,
    ) -> Result<Option<DashboardConfig>, AppError> {
        let config = sqlx::query_as::<_, DashboardConfig>(
            r#"
            UPDATE dashboard_configs
            SET metrics = $2, updated_at = NOW()
            WHERE client_id = $1
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(metrics)
        .fetch_optional(&self.pool)
        .await?;
        Ok(config)
    }
}
