// src/models/analytics.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::campaign::Platform;

// --- FILTRO DE CONSULTA ---

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    // Obrigatório para SUPER_ADMIN; demais perfis usam o próprio tenant.
    pub client_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub platform: Option<Platform>,
}

// --- MÉTRICAS DERIVADAS ---

// Totais + razões derivadas. Toda divisão é guardada contra
// denominador zero (nunca NaN, nunca erro).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    #[schema(value_type = f64)]
    pub spend: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub reach: i64,
    pub leads: i64,
    #[schema(value_type = f64)]
    pub revenue: Decimal,
    pub ctr: f64,
    #[schema(value_type = f64)]
    pub cpc: Decimal,
    #[schema(value_type = f64)]
    pub cpm: Decimal,
    #[schema(value_type = f64)]
    pub cpl: Decimal,
    pub roas: f64,
}

// Um balde mensal do gráfico. Meses presentes em só uma das séries
// (spend ou leads) aparecem com o lado ausente zerado.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    #[schema(example = "2024-03")]
    pub month: String,
    #[schema(value_type = f64)]
    pub spend: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub leads: i64,
}

// Quebra por campanha, agrupada por (campaign_name, platform) — de
// propósito pelo nome desnormalizado, para funcionar mesmo com FK quebrado.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBreakdownEntry {
    pub campaign_name: String,
    pub platform: Platform,
    #[schema(value_type = f64)]
    pub spend: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub leads: i64,
    pub ctr: f64,
    #[schema(value_type = f64)]
    pub cpc: Decimal,
    #[schema(value_type = f64)]
    pub cpl: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsCharts {
    pub monthly: Vec<MonthlyPoint>,
    pub by_campaign: Vec<CampaignBreakdownEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub metrics: MetricsSummary,
    pub charts: AnalyticsCharts,
    pub dashboard: DashboardConfig,
}

// --- CONFIG DE DASHBOARD ---

// Cache por client das métricas/gráficos visíveis e sua ordem.
// Criado preguiçosamente na primeira consulta de analytics.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub id: Uuid,
    pub client_id: Uuid,
    #[schema(example = json!(["spend", "leads", "ctr", "cpl"]))]
    pub metrics: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDashboardConfigPayload {
    pub client_id: Option<Uuid>,
    pub metrics: Vec<String>,
}

// --- LINHAS INTERMEDIÁRIAS (saída dos GROUP BY do repositório) ---

#[derive(Debug, Clone, FromRow)]
pub struct SpendTotalsRow {
    pub spend: Option<Decimal>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
    pub reach: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MonthlySpendRow {
    pub month: Option<String>,
    pub spend: Option<Decimal>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct MonthlyLeadRow {
    pub month: Option<String>,
    pub leads: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CampaignSpendRow {
    pub campaign_name: String,
    pub platform: Platform,
    pub spend: Option<Decimal>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CampaignLeadRow {
    pub campaign_name: Option<String>,
    pub leads: Option<i64>,
}
