// src/services/analytics_service.rs

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AnalyticsRepository,
    models::{
        analytics::{
            AnalyticsCharts, AnalyticsResponse, CampaignBreakdownEntry, CampaignLeadRow,
            CampaignSpendRow, MetricsSummary, MonthlyLeadRow, MonthlyPoint, MonthlySpendRow,
        },
        campaign::Platform,
    },
    services::dashboard_service::DashboardService,
};

// O caminho de leitura dos relatórios. O repositório entrega somas e
// group-bys; aqui derivamos as razões (sempre com guarda de denominador
// zero), unimos as séries mensais e montamos a quebra por campanha.
#[derive(Clone)]
pub struct AnalyticsService {
    repo: AnalyticsRepository,
    dashboard_service: DashboardService,
}

impl AnalyticsService {
    pub fn new(repo: AnalyticsRepository, dashboard_service: DashboardService) -> Self {
        Self { repo, dashboard_service }
    }

    pub async fn get_analytics(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        platform: Option<Platform>,
    ) -> Result<AnalyticsResponse, AppError> {
        let totals = self
            .repo
            .spend_totals(client_id, start_date, end_date, platform)
            .await?;
        // Leads e spend são populações filtradas de forma independente:
        // leads entram pela janela de datas, sem join com spend.
        let leads = self.repo.lead_count(client_id, start_date, end_date).await?;
        let revenue = self.repo.lead_revenue(client_id, start_date, end_date).await?;

        let metrics = derive_metrics(
            totals.spend.unwrap_or(Decimal::ZERO),
            totals.impressions.unwrap_or(0),
            totals.clicks.unwrap_or(0),
            totals.reach.unwrap_or(0),
            leads,
            revenue,
        );

        let monthly_spend = self
            .repo
            .monthly_spend(client_id, start_date, end_date, platform)
            .await?;
        let monthly_leads =
            self.repo.monthly_leads(client_id, start_date, end_date).await?;
        let monthly = merge_monthly(&monthly_spend, &monthly_leads);

        let campaign_spend = self
            .repo
            .campaign_spend(client_id, start_date, end_date, platform)
            .await?;
        let campaign_leads =
            self.repo.campaign_leads(client_id, start_date, end_date).await?;
        let by_campaign = build_campaign_breakdown(&campaign_spend, &campaign_leads);

        let dashboard = self.dashboard_service.get_or_create(client_id).await?;

        Ok(AnalyticsResponse {
            metrics,
            charts: AnalyticsCharts { monthly, by_campaign },
            dashboard,
        })
    }
}

// =============================================================================
//  DERIVAÇÃO PURA (testável sem banco)
// =============================================================================

/// Razões derivadas do funil. TODA divisão é guardada: denominador zero
/// produz 0, nunca NaN nem erro.
pub fn derive_metrics(
    spend: Decimal,
    impressions: i64,
    clicks: i64,
    reach: i64,
    leads: i64,
    revenue: Decimal,
) -> MetricsSummary {
    let spend_f = spend.to_f64().unwrap_or(0.0);

    let ctr = if impressions > 0 { clicks as f64 / impressions as f64 * 100.0 } else { 0.0 };
    let cpc = if clicks > 0 { spend / Decimal::from(clicks) } else { Decimal::ZERO };
    let cpm =
        if impressions > 0 { spend / Decimal::from(impressions) * Decimal::from(1000) } else { Decimal::ZERO };
    let cpl = if leads > 0 { spend / Decimal::from(leads) } else { Decimal::ZERO };
    let roas = if spend_f > 0.0 { revenue.to_f64().unwrap_or(0.0) / spend_f } else { 0.0 };

    MetricsSummary { spend, impressions, clicks, reach, leads, revenue, ctr, cpc, cpm, cpl, roas }
}

/// Une as duas séries mensais (spend e leads) pela UNIÃO dos meses:
/// mês presente em só uma série aparece com o lado ausente zerado —
/// nunca se derruba um mês que exista em qualquer uma delas.
pub fn merge_monthly(
    spend_rows: &[MonthlySpendRow],
    lead_rows: &[MonthlyLeadRow],
) -> Vec<MonthlyPoint> {
    // BTreeMap mantém os meses em ordem cronológica ("YYYY-MM" ordena certo).
    let mut buckets: BTreeMap<String, MonthlyPoint> = BTreeMap::new();

    for row in spend_rows {
        let Some(month) = row.month.clone() else { continue };
        let entry = buckets.entry(month.clone()).or_insert_with(|| MonthlyPoint {
            month,
            spend: Decimal::ZERO,
            impressions: 0,
            clicks: 0,
            leads: 0,
        });
        entry.spend += row.spend.unwrap_or(Decimal::ZERO);
        entry.impressions += row.impressions.unwrap_or(0);
        entry.clicks += row.clicks.unwrap_or(0);
    }

    for row in lead_rows {
        let Some(month) = row.month.clone() else { continue };
        let entry = buckets.entry(month.clone()).or_insert_with(|| MonthlyPoint {
            month,
            spend: Decimal::ZERO,
            impressions: 0,
            clicks: 0,
            leads: 0,
        });
        entry.leads += row.leads.unwrap_or(0);
    }

    buckets.into_values().collect()
}

/// Quebra por campanha: junta leads aos grupos de spend pelo NOME
/// (string, não FK), deriva as razões e ordena por spend decrescente.
pub fn build_campaign_breakdown(
    spend_rows: &[CampaignSpendRow],
    lead_rows: &[CampaignLeadRow],
) -> Vec<CampaignBreakdownEntry> {
    let lead_counts: BTreeMap<&str, i64> = lead_rows
        .iter()
        .filter_map(|r| r.campaign_name.as_deref().map(|n| (n, r.leads.unwrap_or(0))))
        .collect();

    let mut entries: Vec<CampaignBreakdownEntry> = spend_rows
        .iter()
        .map(|row| {
            let spend = row.spend.unwrap_or(Decimal::ZERO);
            let impressions = row.impressions.unwrap_or(0);
            let clicks = row.clicks.unwrap_or(0);
            let leads = lead_counts.get(row.campaign_name.as_str()).copied().unwrap_or(0);

            let ctr =
                if impressions > 0 { clicks as f64 / impressions as f64 * 100.0 } else { 0.0 };
            let cpc = if clicks > 0 { spend / Decimal::from(clicks) } else { Decimal::ZERO };
            let cpl = if leads > 0 { spend / Decimal::from(leads) } else { Decimal::ZERO };

            CampaignBreakdownEntry {
                campaign_name: row.campaign_name.clone(),
                platform: row.platform,
                spend,
                impressions,
                clicks,
                leads,
                ctr,
                cpc,
                cpl,
            }
        })
        .collect();

    // Maior gasto primeiro: é a ordem de apresentação padrão.
    entries.sort_by(|a, b| b.spend.cmp(&a.spend));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64, scale: u32) -> Decimal {
        Decimal::new(v, scale)
    }

    #[test]
    fn razoes_derivadas_com_dados_normais() {
        let m = derive_metrics(dec(100_00, 2), 10_000, 250, 8_000, 20, dec(500_00, 2));
        assert_eq!(m.ctr, 2.5);
        assert_eq!(m.cpc, dec(40, 2)); // 100 / 250
        assert_eq!(m.cpm, dec(10_00, 2)); // 100 / 10000 * 1000
        assert_eq!(m.cpl, dec(5_00, 2)); // 100 / 20
        assert_eq!(m.roas, 5.0);
    }

    #[test]
    fn denominador_zero_nunca_estoura() {
        let m = derive_metrics(dec(100_00, 2), 0, 0, 0, 0, Decimal::ZERO);
        assert_eq!(m.ctr, 0.0);
        assert_eq!(m.cpc, Decimal::ZERO);
        assert_eq!(m.cpm, Decimal::ZERO);
        assert_eq!(m.cpl, Decimal::ZERO);
        assert!(m.ctr.is_finite());
    }

    #[test]
    fn roas_com_spend_zero_e_zero() {
        let m = derive_metrics(Decimal::ZERO, 0, 0, 0, 5, dec(900_00, 2));
        assert_eq!(m.roas, 0.0);
    }

    #[test]
    fn meses_de_series_diferentes_nao_sao_derrubados() {
        // Spend só em março, leads só em abril: os DOIS meses aparecem.
        let spend = vec![MonthlySpendRow {
            month: Some("2024-03".to_string()),
            spend: Some(dec(50_00, 2)),
            impressions: Some(1000),
            clicks: Some(10),
        }];
        let leads = vec![MonthlyLeadRow { month: Some("2024-04".to_string()), leads: Some(7) }];

        let merged = merge_monthly(&spend, &leads);
        assert_eq!(merged.len(), 2);

        assert_eq!(merged[0].month, "2024-03");
        assert_eq!(merged[0].spend, dec(50_00, 2));
        assert_eq!(merged[0].leads, 0);

        assert_eq!(merged[1].month, "2024-04");
        assert_eq!(merged[1].spend, Decimal::ZERO);
        assert_eq!(merged[1].leads, 7);
    }

    #[test]
    fn mes_presente_nas_duas_series_recebe_os_dois_lados() {
        let spend = vec![MonthlySpendRow {
            month: Some("2024-05".to_string()),
            spend: Some(dec(10_00, 2)),
            impressions: Some(500),
            clicks: Some(5),
        }];
        let leads = vec![MonthlyLeadRow { month: Some("2024-05".to_string()), leads: Some(3) }];

        let merged = merge_monthly(&spend, &leads);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].spend, dec(10_00, 2));
        assert_eq!(merged[0].leads, 3);
    }

    #[test]
    fn quebra_por_campanha_ordena_por_spend_decrescente() {
        let spend = vec![
            CampaignSpendRow {
                campaign_name: "Barata".to_string(),
                platform: Platform::Meta,
                spend: Some(dec(10_00, 2)),
                impressions: Some(100),
                clicks: Some(2),
            },
            CampaignSpendRow {
                campaign_name: "Cara".to_string(),
                platform: Platform::Google,
                spend: Some(dec(90_00, 2)),
                impressions: Some(900),
                clicks: Some(30),
            },
        ];
        let breakdown = build_campaign_breakdown(&spend, &[]);
        assert_eq!(breakdown[0].campaign_name, "Cara");
        assert_eq!(breakdown[1].campaign_name, "Barata");
    }

    #[test]
    fn leads_entram_na_quebra_pelo_nome_nao_pelo_fk() {
        let spend = vec![CampaignSpendRow {
            campaign_name: "Promo".to_string(),
            platform: Platform::Meta,
            spend: Some(dec(30_00, 2)),
            impressions: Some(300),
            clicks: Some(6),
        }];
        let leads = vec![CampaignLeadRow { campaign_name: Some("Promo".to_string()), leads: Some(3) }];

        let breakdown = build_campaign_breakdown(&spend, &leads);
        assert_eq!(breakdown[0].leads, 3);
        assert_eq!(breakdown[0].cpl, dec(10_00, 2));

        // Campanha sem leads casados: cpl guardado em zero.
        let sem_leads = build_campaign_breakdown(&spend, &[]);
        assert_eq!(sem_leads[0].leads, 0);
        assert_eq!(sem_leads[0].cpl, Decimal::ZERO);
    }
}
