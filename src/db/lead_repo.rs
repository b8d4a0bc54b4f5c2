// src/db/lead_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, StageHistory},
};

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        customer_name: &str,
        phone: &str,
        email: Option<&str>,
        pipeline_id: Uuid,
        current_stage: &str,
        campaign_id: Option<Uuid>,
        campaign_name: Option<&str>,
        value: Option<Decimal>,
        custom_data: &Value,
        created_by_id: Option<Uuid>,
        lead_date: NaiveDate,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (
                client_id, customer_name, phone, email, pipeline_id, current_stage,
                campaign_id, campaign_name, value, custom_data, created_by_id, lead_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(customer_name)
        .bind(phone)
        .bind(email)
        .bind(pipeline_id)
        .bind(current_stage)
        .bind(campaign_id)
        .bind(campaign_name)
        .bind(value)
        .bind(custom_data)
        .bind(created_by_id)
        .bind(lead_date)
        .fetch_one(executor)
        .await?;
        Ok(lead)
    }

    pub async fn find_by_id(
        &self,
        client_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE id = $1 AND client_id = $2",
        )
        .bind(id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lead)
    }

    pub async fn list(
        &self,
        client_id: Uuid,
        pipeline_id: Option<Uuid>,
    ) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT * FROM leads
            WHERE client_id = $1
              AND ($2::uuid IS NULL OR pipeline_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_id)
        .bind(pipeline_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(leads)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        client_id: Uuid,
        id: Uuid,
        customer_name: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
        campaign_id: Option<Uuid>,
        value: Option<Decimal>,
        custom_data: Option<&Value>,
    ) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET customer_name = COALESCE($3, customer_name),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                campaign_id = COALESCE($6, campaign_id),
                value = COALESCE($7, value),
                custom_data = COALESCE($8, custom_data),
                updated_at = NOW()
            WHERE id = $1 AND client_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id)
        .bind(customer_name)
        .bind(phone)
        .bind(email)
        .bind(campaign_id)
        .bind(value)
        .bind(custom_data)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lead)
    }

    /// Move o lead de estágio. A validação do destino acontece no service;
    /// aqui só persistimos a transição.
    pub async fn set_stage<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        id: Uuid,
        to_stage: &str,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET current_stage = $3, updated_at = NOW()
            WHERE id = $1 AND client_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id)
        .bind(to_stage)
        .fetch_optional(executor)
        .await?;
        Ok(lead)
    }

    pub async fn insert_stage_history<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
        from_stage: &str,
        to_stage: &str,
        changed_by_id: Option<Uuid>,
    ) -> Result<StageHistory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, StageHistory>(
            r#"
            INSERT INTO stage_history (lead_id, from_stage, to_stage, changed_by_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(lead_id)
        .bind(from_stage)
        .bind(to_stage)
        .bind(changed_by_id)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    pub async fn stage_history(
        &self,
        lead_id: Uuid,
    ) -> Result<Vec<StageHistory>, AppError> {
        let entries = sqlx::query_as::<_, StageHistory>(
            "SELECT * FROM stage_history WHERE lead_id = $1 ORDER BY changed_at ASC",
        )
        .bind(lead_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn delete(
        &self,
        client_id: Uuid,
        id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND client_id = $2")
            .bind(id)
            .bind(client_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Reaponta em lote os leads das campanhas de origem para o alvo do merge.
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
            "UPDATE leads SET campaign_id = $1, updated_at = NOW() WHERE campaign_id = ANY($2)",
        )
        .bind(target_id)
        .bind(source_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
