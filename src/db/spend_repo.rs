// src/db/spend_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{campaign::Platform, spend::SpendLog},
};

#[derive(Clone)]
pub struct SpendRepository {
    pool: PgPool,
}

impl SpendRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere uma observação de spend (importação ou entrada manual).
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        client_id: Uuid,
        date: NaiveDate,
        campaign_id: Option<Uuid>,
        campaign_name: &str,
        platform: Platform,
        spend: Decimal,
        impressions: i64,
        clicks: i64,
        reach: i64,
        import_batch_id: Option<&str>,
        raw_data: Option<&Value>,
    ) -> Result<SpendLog, AppError> {
        let log = sqlx::query_as::<_, SpendLog>(
            r#"
            INSERT INTO spend_logs (
                client_id, date, campaign_id, campaign_name, platform,
                spend, impressions, clicks, reach, import_batch_id, raw_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(date)
        .bind(campaign_id)
        .bind(campaign_name)
        .bind(platform)
        .bind(spend)
        .bind(impressions)
        .bind(clicks)
        .bind(reach)
        .bind(import_batch_id)
        .bind(raw_data)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    pub async fn list(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        platform: Option<Platform>,
    ) -> Result<Vec<SpendLog>, AppError> {
        let logs = sqlx::query_as::<_, SpendLog>(
            r#"
            SELECT * FROM spend_logs
            WHERE client_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
              AND ($4::platform IS NULL OR platform = $4)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(client_id)
        .bind(start_date)
        .bind(end_date)
        .bind(platform)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    /// Edição inline: corrige só os campos fornecidos.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        client_id: Uuid,
        id: Uuid,
        date: Option<NaiveDate>,
        platform: Option<Platform>,
        campaign_id: Option<Uuid>,
        spend: Option<Decimal>,
        impressions: Option<i64>,
        clicks: Option<i64>,
        reach: Option<i64>,
    ) -> Result<Option<SpendLog>, AppError> {
        let log = sqlx::query_as::<_, SpendLog>(
            r#"
            UPDATE spend_logs
            SET date = COALESCE($3, date),
                platform = COALESCE($4, platform),
                campaign_id = COALESCE($5, campaign_id),
                spend = COALESCE($6, spend),
                impressions = COALESCE($7, impressions),
                clicks = COALESCE($8, clicks),
                reach = COALESCE($9, reach),
                updated_at = NOW()
            WHERE id = $1 AND client_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id)
        .bind(date)
        .bind(platform)
        .bind(campaign_id)
        .bind(spend)
        .bind(impressions)
        .bind(clicks)
        .bind(reach)
        .fetch_optional(&self.pool)
        .await?;
        Ok(log)
    }

    pub async fn delete(
        &self,
        client_id: Uuid,
        id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM spend_logs WHERE id = $1 AND client_id = $2")
            .bind(id)
            .bind(client_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Reaponta em lote as linhas das campanhas de origem para o alvo
    /// do merge. O snapshot `campaign_name` não é tocado.
    pub async fn reassign_campaign<'e, E>(
        &self,
        executor: E,
        source_ids: &[Uuid],
        target_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE spend_logs SET campaign_id = $1, updated_at = NOW() WHERE campaign_id = ANY($2)",
        )
        .bind(target_id)
        .bind(source_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
