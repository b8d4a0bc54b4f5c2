// src/services/import_service.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LeadRepository, PipelineRepository, SpendRepository},
    models::{
        campaign::Platform,
        import::{ImportLeadsSummary, ImportSummary},
    },
    services::{
        campaign_service::CampaignService,
        column_mapper::{resolve_row_value, CanonicalField},
    },
};

// Offset entre o epoch serial de planilha (1899-12-30) e o epoch Unix, em dias.
const SPREADSHEET_EPOCH_OFFSET_DAYS: f64 = 25569.0;

#[derive(Clone)]
pub struct ImportService {
    spend_repo: SpendRepository,
    lead_repo: LeadRepository,
    pipeline_repo: PipelineRepository,
    campaign_service: CampaignService,
    pool: sqlx::PgPool,
}

impl ImportService {
    pub fn new(
        spend_repo: SpendRepository,
        lead_repo: LeadRepository,
        pipeline_repo: PipelineRepository,
        campaign_service: CampaignService,
        pool: sqlx::PgPool,
    ) -> Self {
        Self { spend_repo, lead_repo, pipeline_repo, campaign_service, pool }
    }

    // =========================================================================
    //  IMPORTAÇÃO DE SPEND
    // =========================================================================

    /// Ingere linhas cruas de planilha como spend logs.
    ///
    /// Cada linha é independente: erro numa linha não aborta o batch
    /// (pula, conta e segue). Já a criação de campanha é transacional em
    /// grão mais fino, dentro do find_or_create.
    pub async fn import_spend(
        &self,
        client_id: Uuid,
        global_platform: Option<Platform>,
        rows: &[Map<String, Value>],
    ) -> Result<ImportSummary, AppError> {
        let batch_id = format!("imp-{}", Utc::now().timestamp_millis());

        let mut count: u64 = 0;
        let mut skipped: u64 = 0;
        let mut new_campaigns: u64 = 0;

        for row in rows {
            // 1. Nome da campanha: sem ele a linha não tem identidade — pula.
            let Some(campaign_name) = extract_campaign_name(row) else {
                skipped += 1;
                continue;
            };

            // 2. Data: linha sem data confiável é pulada e reportada,
            // nunca silenciosamente carimbada com "agora".
            let date_value = resolve_row_value(row, CanonicalField::Date);
            let Some(date) = date_value.and_then(parse_row_date) else {
                skipped += 1;
                continue;
            };

            // 3. Plataforma: o valor da linha vence a seleção global.
            let platform = extract_platform(row, global_platform);

            // 4. Identidade canônica da campanha.
            let (campaign, created) =
                self.campaign_service.find_or_create(client_id, &campaign_name, platform).await?;
            if created {
                new_campaigns += 1;
            }

            // 5. Campos numéricos: coage para 0 em falha de parse.
            let spend = parse_spend(resolve_row_value(row, CanonicalField::Spend));
            let impressions = parse_count(resolve_row_value(row, CanonicalField::Impressions));
            let clicks = parse_count(resolve_row_value(row, CanonicalField::Clicks));
            let reach = parse_count(resolve_row_value(row, CanonicalField::Reach));

            let insert = self
                .spend_repo
                .insert(
                    client_id,
                    date,
                    Some(campaign.id),
                    &campaign_name,
                    platform,
                    spend,
                    impressions,
                    clicks,
                    reach,
                    Some(&batch_id),
                    Some(&Value::Object(row.clone())),
                )
                .await;

            match insert {
                Ok(_) => count += 1,
                Err(e) => {
                    // Erro local: reporta no contador e segue o batch.
                    tracing::warn!("Linha do batch {} falhou ao persistir: {}", batch_id, e);
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            "📥 Batch {}: {} linhas importadas, {} puladas, {} campanhas novas.",
            batch_id,
            count,
            skipped,
            new_campaigns
        );

        Ok(ImportSummary { count, skipped, new_campaigns, batch_id })
    }

    // =========================================================================
    //  IMPORTAÇÃO DE LEADS (tudo-ou-nada)
    // =========================================================================

    /// Importa leads em massa dentro de UMA transação: qualquer linha
    /// inválida desfaz o lote inteiro (sem sucesso parcial).
    ///
    /// O rollback cobre só os leads: campanhas criadas na pré-resolução
    /// persistem mesmo se o lote falhar, e são reaproveitadas na retentativa.
    pub async fn import_leads(
        &self,
        client_id: Uuid,
        pipeline_id: Uuid,
        created_by_id: Option<Uuid>,
        rows: &[Map<String, Value>],
    ) -> Result<ImportLeadsSummary, AppError> {
        let pipeline = self
            .pipeline_repo
            .find_by_id(client_id, pipeline_id)
            .await?
            .ok_or(AppError::NotFound("Pipeline"))?;

        let stages = pipeline.parse_stages();
        let default_stage = stages
            .iter()
            .min_by_key(|s| s.order)
            .map(|s| s.id.clone())
            .ok_or_else(|| {
                AppError::ImportRowError("O pipeline não possui estágios.".to_string())
            })?;

        let batch_id = format!("leads-{}", Utc::now().timestamp_millis());

        // Pré-resolve a identidade das campanhas citadas, fora da transação
        // (a criação de campanha já é transacional no grão dela).
        let mut resolved: Vec<(Option<Uuid>, Option<String>)> = Vec::with_capacity(rows.len());
        for row in rows {
            match extract_campaign_name(row) {
                Some(name) => {
                    // Linhas de lead não carregam rótulo de plataforma.
                    let (campaign, _) = self
                        .campaign_service
                        .find_or_create(client_id, &name, Platform::Other)
                        .await?;
                    resolved.push((Some(campaign.id), Some(name)));
                }
                None => resolved.push((None, None)),
            }
        }

        let mut tx = self.pool.begin().await?;
        let mut count: u64 = 0;

        for (idx, row) in rows.iter().enumerate() {
            let Some(customer_name) = lead_field(row, &["name", "nome", "customer", "cliente"])
            else {
                // Falha qualquer => rollback do lote inteiro.
                return Err(AppError::ImportRowError(format!(
                    "Linha {}: nome do lead ausente; nenhuma linha foi importada.",
                    idx + 1
                )));
            };
            let Some(phone) =
                lead_field(row, &["phone", "telefone", "whatsapp", "wa", "hp", "no hp"])
            else {
                return Err(AppError::ImportRowError(format!(
                    "Linha {}: telefone ausente; nenhuma linha foi importada.",
                    idx + 1
                )));
            };

            let email = lead_field(row, &["email", "e mail"]);
            let value = lead_field(row, &["value", "valor", "nilai", "deal"])
                .map(|v| parse_spend_value(&Value::String(v)));
            let lead_date = resolve_row_value(row, CanonicalField::Date)
                .and_then(parse_row_date)
                .unwrap_or_else(|| Utc::now().date_naive());

            let (campaign_id, campaign_name) = resolved[idx].clone();

            self.lead_repo
                .insert(
                    &mut *tx,
                    client_id,
                    &customer_name,
                    &phone,
                    email.as_deref(),
                    pipeline_id,
                    &default_stage,
                    campaign_id,
                    campaign_name.as_deref(),
                    value,
                    &Value::Object(Map::new()),
                    created_by_id,
                    lead_date,
                )
                .await?;
            count += 1;
        }

        tx.commit().await?;

        tracing::info!("📥 Batch {}: {} leads importados.", batch_id, count);
        Ok(ImportLeadsSummary { count, batch_id })
    }
}

// =============================================================================
//  PARSE DE VALORES CRUS
// =============================================================================

/// Nome da campanha extraído da linha. Números viram string (planilhas
/// às vezes guardam códigos de campanha como número).
fn extract_campaign_name(row: &Map<String, Value>) -> Option<String> {
    let value = resolve_row_value(row, CanonicalField::CampaignName)?;
    let name = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if name.is_empty() { None } else { Some(name) }
}

fn extract_platform(row: &Map<String, Value>, global: Option<Platform>) -> Platform {
    resolve_row_value(row, CanonicalField::Platform)
        .and_then(|v| v.as_str())
        .map(Platform::classify)
        .or(global)
        .unwrap_or(Platform::Other)
}

/// Serial de planilha -> data de calendário.
/// Ex.: 45000 -> (45000 - 25569) * 86400 s do epoch Unix -> 2023-03-15.
fn parse_serial_date(serial: f64) -> Option<NaiveDate> {
    let secs = ((serial - SPREADSHEET_EPOCH_OFFSET_DAYS) * 86_400.0).round() as i64;
    Some(DateTime::from_timestamp(secs, 0)?.date_naive())
}

/// Data de uma célula: número é serial de planilha; string tenta os
/// formatos de calendário usuais e por último serial em string.
fn parse_row_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => parse_serial_date(n.as_f64()?),
        Value::String(s) => {
            let s = s.trim();
            for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"] {
                if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                    return Some(date);
                }
            }
            s.parse::<f64>().ok().and_then(parse_serial_date)
        }
        _ => None,
    }
}

/// Contadores (impressions/clicks/reach): coage para 0 em falha,
/// nunca negativo.
fn parse_count(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f as i64),
        Some(Value::String(s)) => s.trim().replace([',', ' '], "").parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    };
    parsed.unwrap_or(0).max(0)
}

fn parse_spend_value(value: &Value) -> Decimal {
    parse_spend(Some(value))
}

/// Moeda: coage para 0 em falha, nunca negativa (invariante spend >= 0).
fn parse_spend(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().and_then(Decimal::from_f64),
        Some(Value::String(s)) => {
            let cleaned = s.trim().replace([',', ' '], "");
            Decimal::from_str(&cleaned)
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().and_then(Decimal::from_f64))
        }
        _ => None,
    };
    parsed.unwrap_or(Decimal::ZERO).max(Decimal::ZERO)
}

/// Busca tolerante de campos de lead por lista de apelidos de coluna.
/// Colunas de campanha são ignoradas para "Campaign Name" não ser
/// confundido com o nome do cliente.
fn lead_field(row: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    for (key, value) in row {
        if crate::services::column_mapper::match_header(key)
            == Some(CanonicalField::CampaignName)
        {
            continue;
        }
        let normalized = key.to_lowercase().replace(['-', '_', '.'], " ");
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        if aliases.iter().any(|a| normalized.contains(a)) {
            let text = match value {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => continue,
            };
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn serial_45000_vira_2023_03_15() {
        let date = parse_serial_date(45000.0).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
    }

    #[test]
    fn data_numerica_na_celula_e_tratada_como_serial() {
        let date = parse_row_date(&json!(45000)).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());

        // Serial guardado como string também.
        let date = parse_row_date(&json!("45000")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
    }

    #[test]
    fn data_em_string_aceita_formatos_usuais() {
        assert_eq!(
            parse_row_date(&json!("2024-01-31")),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
        assert_eq!(
            parse_row_date(&json!("31/01/2024")),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }

    #[test]
    fn data_invalida_nao_vira_agora() {
        assert_eq!(parse_row_date(&json!("ontem")), None);
        assert_eq!(parse_row_date(&json!(null)), None);
    }

    #[test]
    fn contadores_coagem_para_zero() {
        assert_eq!(parse_count(Some(&json!(120))), 120);
        assert_eq!(parse_count(Some(&json!("1,500"))), 1500);
        assert_eq!(parse_count(Some(&json!("abc"))), 0);
        assert_eq!(parse_count(Some(&json!(-5))), 0);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn spend_coage_para_zero_e_nunca_e_negativo() {
        assert_eq!(parse_spend(Some(&json!(150.75))), Decimal::new(15075, 2));
        assert_eq!(parse_spend(Some(&json!("99.90"))), Decimal::new(9990, 2));
        assert_eq!(parse_spend(Some(&json!("n/a"))), Decimal::ZERO);
        assert_eq!(parse_spend(Some(&json!(-10))), Decimal::ZERO);
        assert_eq!(parse_spend(None), Decimal::ZERO);
    }

    #[test]
    fn plataforma_da_linha_vence_a_global() {
        let r = row(json!({"Platform": "TikTok Ads", "Campaign": "X"}));
        assert_eq!(extract_platform(&r, Some(Platform::Meta)), Platform::Tiktok);
    }

    #[test]
    fn plataforma_global_cobre_linha_sem_coluna() {
        let r = row(json!({"Campaign": "X"}));
        assert_eq!(extract_platform(&r, Some(Platform::Google)), Platform::Google);
        assert_eq!(extract_platform(&r, None), Platform::Other);
    }

    #[test]
    fn nome_de_campanha_numerico_vira_string() {
        let r = row(json!({"Campaign Name": 12345}));
        assert_eq!(extract_campaign_name(&r), Some("12345".to_string()));
    }

    #[test]
    fn linha_sem_campanha_nao_tem_identidade() {
        let r = row(json!({"Date": "2024-01-01", "Spend": 10}));
        assert_eq!(extract_campaign_name(&r), None);
    }

    #[test]
    fn campos_de_lead_sao_resolvidos_por_apelido() {
        let r = row(json!({"Nome do Cliente": "Maria", "No. HP": "0812"}));
        assert_eq!(lead_field(&r, &["name", "nome"]), Some("Maria".to_string()));
        assert_eq!(lead_field(&r, &["phone", "hp"]), Some("0812".to_string()));
        assert_eq!(lead_field(&r, &["email"]), None);
    }
}
