// src/db/analytics_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        analytics::{
            CampaignLeadRow, CampaignSpendRow, MonthlyLeadRow, MonthlySpendRow, SpendTotalsRow,
        },
        campaign::Platform,
    },
};

// Caminho de leitura dos relatórios: somas e group-bys sobre spend_logs
// e leads. A montagem final (razões derivadas, união dos meses, ordenação)
// fica no AnalyticsService, onde dá para testar sem banco.
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn spend_totals(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        platform: Option<Platform>,
    ) -> Result<SpendTotalsRow, AppError> {
        let totals = sqlx::query_as::<_, SpendTotalsRow>(
            r#"
            SELECT
                SUM(spend) AS spend,
                SUM(impressions) AS impressions,
                SUM(clicks) AS clicks,
                SUM(reach) AS reach
            FROM spend_logs
            WHERE client_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
              AND ($4::platform IS NULL OR platform = $4)
            "#,
        )
        .bind(client_id)
        .bind(start_date)
        .bind(end_date)
        .bind(platform)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    /// Leads contados pela janela de datas, sem join com spend: são
    /// populações filtradas de forma independente, de propósito (leads
    /// podem chegar com ou sem campanha resolvida).
    pub async fn lead_count(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM leads
            WHERE client_id = $1
              AND ($2::date IS NULL OR lead_date >= $2)
              AND ($3::date IS NULL OR lead_date <= $3)
            "#,
        )
        .bind(client_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Receita atribuída: soma dos valores de negócio dos leads na janela.
    pub async fn lead_revenue(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Decimal, AppError> {
        let (revenue,): (Option<Decimal>,) = sqlx::query_as(
            r#"
            SELECT SUM(value) FROM leads
            WHERE client_id = $1
              AND ($2::date IS NULL OR lead_date >= $2)
              AND ($3::date IS NULL OR lead_date <= $3)
            "#,
        )
        .bind(client_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(revenue.unwrap_or(Decimal::ZERO))
    }

    pub async fn monthly_spend(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        platform: Option<Platform>,
    ) -> Result<Vec<MonthlySpendRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlySpendRow>(
            r#"
            SELECT
                to_char(date, 'YYYY-MM') AS month,
                SUM(spend) AS spend,
                SUM(impressions) AS impressions,
                SUM(clicks) AS clicks
            FROM spend_logs
            WHERE client_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
              AND ($4::platform IS NULL OR platform = $4)
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(client_id)
        .bind(start_date)
        .bind(end_date)
        .bind(platform)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn monthly_leads(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<MonthlyLeadRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyLeadRow>(
            r#"
            SELECT
                to_char(lead_date, 'YYYY-MM') AS month,
                COUNT(*) AS leads
            FROM leads
            WHERE client_id = $1
              AND ($2::date IS NULL OR lead_date >= $2)
              AND ($3::date IS NULL OR lead_date <= $3)
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(client_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Agrupa pelo par (campaign_name, platform) desnormalizado — NÃO pelo
    /// campaign_id — para que a visão funcione mesmo com o vínculo quebrado.
    pub async fn campaign_spend(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        platform: Option<Platform>,
    ) -> Result<Vec<CampaignSpendRow>, AppError> {
        let rows = sqlx::query_as::<_, CampaignSpendRow>(
            r#"
            SELECT
                campaign_name,
                platform,
                SUM(spend) AS spend,
                SUM(impressions) AS impressions,
                SUM(clicks) AS clicks
            FROM spend_logs
            WHERE client_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
              AND ($4::platform IS NULL OR platform = $4)
            GROUP BY campaign_name, platform
            "#,
        )
        .bind(client_id)
        .bind(start_date)
        .bind(end_date)
        .bind(platform)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Contagem de leads por nome de campanha (string, não FK).
    pub async fn campaign_leads(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<CampaignLeadRow>, AppError> {
        let rows = sqlx::query_as::<_, CampaignLeadRow>(
            r#"
            SELECT
                campaign_name,
                COUNT(*) AS leads
            FROM leads
            WHERE client_id = $1
              AND campaign_name IS NOT NULL
              AND ($2::date IS NULL OR lead_date >= $2)
              AND ($3::date IS NULL OR lead_date <= $3)
            GROUP BY campaign_name
            "#,
        )
        .bind(client_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
