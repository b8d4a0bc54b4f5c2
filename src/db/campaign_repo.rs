// src/db/campaign_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::campaign::{Campaign, CampaignWithCounts, Platform},
};

#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  IDENTIDADE (find-or-create)
    // =========================================================================

    /// Busca pela identidade canônica (client_id, original_name).
    pub async fn find_by_original_name(
        &self,
        client_id: Uuid,
        original_name: &str,
    ) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            "SELECT * FROM campaigns WHERE client_id = $1 AND original_name = $2",
        )
        .bind(client_id)
        .bind(original_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(campaign)
    }

    /// Insere uma campanha nova. Retorna `None` quando o índice único
    /// (client_id, original_name) rejeitar o insert — outra importação
    /// concorrente venceu a corrida e o chamador deve refazer o SELECT.
    pub async fn try_insert(
        &self,
        client_id: Uuid,
        name: &str,
        platform: Platform,
    ) -> Result<Option<Campaign>, AppError> {
        let result = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (client_id, name, original_name, platform)
            VALUES ($1, $2, $2, $3)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(name)
        .bind(platform)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(campaign) => Ok(Some(campaign)),
            Err(e) => {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return Ok(None);
                    }
                }
                Err(e.into())
            }
        }
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub async fn find_by_id(
        &self,
        client_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            "SELECT * FROM campaigns WHERE id = $1 AND client_id = $2",
        )
        .bind(id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(campaign)
    }

    /// Busca várias campanhas do tenant de uma vez (pré-checagem do merge).
    pub async fn find_many(
        &self,
        client_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Campaign>, AppError> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            "SELECT * FROM campaigns WHERE client_id = $1 AND id = ANY($2)",
        )
        .bind(client_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(campaigns)
    }

    /// Listagem com contadores de spend logs e leads vinculados.
    pub async fn list_with_counts(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<CampaignWithCounts>, AppError> {
        let campaigns = sqlx::query_as::<_, CampaignWithCounts>(
            r#"
            SELECT
                c.*,
                (SELECT COUNT(*) FROM spend_logs s WHERE s.campaign_id = c.id) AS spend_count,
                (SELECT COUNT(*) FROM leads l WHERE l.campaign_id = c.id) AS lead_count
            FROM campaigns c
            WHERE c.client_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(campaigns)
    }

    pub async fn find_with_counts(
        &self,
        client_id: Uuid,
        id: Uuid,
    ) -> Result<Option<CampaignWithCounts>, AppError> {
        let campaign = sqlx::query_as::<_, CampaignWithCounts>(
            r#"
            SELECT
                c.*,
                (SELECT COUNT(*) FROM spend_logs s WHERE s.campaign_id = c.id) AS spend_count,
                (SELECT COUNT(*) FROM leads l WHERE l.campaign_id = c.id) AS lead_count
            FROM campaigns c
            WHERE c.id = $1 AND c.client_id = $2
            "#,
        )
        .bind(id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(campaign)
    }

    // =========================================================================
    //  MUTAÇÕES
    // =========================================================================

    /// Atualização pontual (rename, correção de plataforma, ativação).
    /// `original_name` nunca é tocado aqui: é imutável após a criação.
    pub async fn update(
        &self,
        client_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        platform: Option<Platform>,
        is_active: Option<bool>,
    ) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            UPDATE campaigns
            SET name = COALESCE($3, name),
                platform = COALESCE($4, platform),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1 AND client_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id)
        .bind(name)
        .bind(platform)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(campaign)
    }

    /// Substitui a lista de aliases do alvo do merge.
    pub async fn set_aliases<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        aliases: &[String],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE campaigns SET aliases = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(aliases)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_many<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM campaigns WHERE client_id = $1 AND id = ANY($2)")
            .bind(client_id)
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
