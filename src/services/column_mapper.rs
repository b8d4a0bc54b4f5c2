// src/services/column_mapper.rs
//
// O mapeador de colunas compartilhado: o MESMO módulo atende o preview
// interativo de upload (validação de cabeçalhos) e a ingestão no servidor
// (resolução de valores linha a linha). Antes eram dois matchers com risco
// de divergirem; aqui é um só.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::common::error::AppError;
use crate::models::campaign::Platform;

// --- CAMPOS CANÔNICOS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Date,
    CampaignName,
    Ctr,
    Cpc,
    Spend,
    Impressions,
    Clicks,
    Reach,
    Leads,
    Platform,
}

impl CanonicalField {
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::Date => "date",
            CanonicalField::CampaignName => "campaignName",
            CanonicalField::Ctr => "ctr",
            CanonicalField::Cpc => "cpc",
            CanonicalField::Spend => "spend",
            CanonicalField::Impressions => "impressions",
            CanonicalField::Clicks => "clicks",
            CanonicalField::Reach => "reach",
            CanonicalField::Leads => "leads",
            CanonicalField::Platform => "platform",
        }
    }
}

// Grupos de padrões em ORDEM: o primeiro que casar vence.
// CTR/CPC vêm antes de Spend para que "CPC (cost per click)" não seja
// capturado pelo padrão de custo.
static PATTERN_GROUPS: LazyLock<Vec<(CanonicalField, Regex)>> = LazyLock::new(|| {
    vec![
        (CanonicalField::Date, Regex::new(r"\b(date|day|data|dia|tanggal|periode?)\b").unwrap()),
        (
            CanonicalField::CampaignName,
            Regex::new(r"(campaign|campanha|kampanye|ad ?set|ad ?group|iklan)").unwrap(),
        ),
        (CanonicalField::Ctr, Regex::new(r"\bctr\b").unwrap()),
        (CanonicalField::Cpc, Regex::new(r"\bcpc\b|cost per").unwrap()),
        (
            CanonicalField::Spend,
            Regex::new(r"(spend|spent|cost|gasto|biaya|amount)").unwrap(),
        ),
        (
            CanonicalField::Impressions,
            Regex::new(r"(impress|tayangan)").unwrap(),
        ),
        (CanonicalField::Clicks, Regex::new(r"(click|clique|klik)").unwrap()),
        (CanonicalField::Reach, Regex::new(r"(reach|alcance|jangkauan)").unwrap()),
        (CanonicalField::Leads, Regex::new(r"(lead|result|hasil)").unwrap()),
        (
            CanonicalField::Platform,
            Regex::new(r"(platform|plataforma|source|channel|canal|fonte)").unwrap(),
        ),
    ]
});

// Limiares do portão anti-lixo (ver validate_headers).
const MIN_MATCH_RATIO: f64 = 0.4;
const MAX_UNMATCHED: usize = 10;

/// Normaliza um cabeçalho cru: minúsculas, separadores viram espaço,
/// espaços colapsados.
fn normalize_header(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| match c {
            '-' | '_' | '.' | '/' | '\\' | '(' | ')' | '[' | ']' | ':' | ',' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Testa um único cabeçalho contra os grupos de padrões.
pub fn match_header(raw: &str) -> Option<CanonicalField> {
    let normalized = normalize_header(raw);
    if normalized.is_empty() {
        return None;
    }
    PATTERN_GROUPS
        .iter()
        .find(|(_, re)| re.is_match(&normalized))
        .map(|(field, _)| *field)
}

// O mapeamento header -> campo, na ordem original dos cabeçalhos.
#[derive(Debug, Clone)]
pub struct HeaderMapping {
    pub entries: Vec<(String, CanonicalField)>,
    pub total_headers: usize,
}

impl HeaderMapping {
    pub fn matched(&self) -> usize {
        self.entries.len()
    }

    pub fn has_field(&self, field: CanonicalField) -> bool {
        self.entries.iter().any(|(_, f)| *f == field)
    }
}

/// Mapeia cada cabeçalho para um campo canônico. Um campo já reivindicado
/// por um cabeçalho anterior não pode ser reivindicado de novo
/// (first-match-first-serve): dois cabeçalhos nunca apontam para o mesmo campo.
pub fn map_headers(headers: &[String]) -> HeaderMapping {
    let mut entries: Vec<(String, CanonicalField)> = Vec::new();

    for header in headers {
        if let Some(field) = match_header(header) {
            if !entries.iter().any(|(_, f)| *f == field) {
                entries.push((header.clone(), field));
            }
        }
    }

    HeaderMapping { entries, total_headers: headers.len() }
}

/// Portão de aceitação da importação. Planilhas com colunas demais sem
/// padrão reconhecível são tratadas como upload de formato errado, não
/// como dado válido com colunas extras.
pub fn validate_headers(headers: &[String]) -> Result<HeaderMapping, AppError> {
    let mapping = map_headers(headers);

    if !mapping.has_field(CanonicalField::CampaignName) {
        return Err(AppError::InvalidColumns(
            "Nenhuma coluna de campanha foi reconhecida. Verifique se o arquivo exportado \
             contém a coluna de nome da campanha."
                .to_string(),
        ));
    }

    let total = mapping.total_headers;
    let matched = mapping.matched();
    let ratio = matched as f64 / total as f64;
    if ratio < MIN_MATCH_RATIO {
        return Err(AppError::InvalidColumns(format!(
            "Apenas {} de {} colunas foram reconhecidas. O arquivo não parece ser um \
             relatório de anúncios suportado.",
            matched, total
        )));
    }

    if total - matched > MAX_UNMATCHED {
        return Err(AppError::InvalidColumns(format!(
            "{} colunas não reconhecidas. O arquivo não parece ser um relatório de \
             anúncios suportado.",
            total - matched
        )));
    }

    Ok(mapping)
}

/// Modo auto-detect para sugestão de templates salvos: mesmos grupos de
/// regex, com o template padrão da plataforma preenchendo cabeçalhos que
/// o matcher não reconheceu (ex.: export do Meta chama a coluna de gasto
/// de "Amount spent (IDR)").
pub fn detect_columns(headers: &[String], platform: Option<Platform>) -> HeaderMapping {
    let mut mapping = map_headers(headers);

    if let Some(platform) = platform {
        for header in headers {
            if mapping.entries.iter().any(|(h, _)| h == header) {
                continue;
            }
            if let Some(field) = template_field(platform, header) {
                if !mapping.entries.iter().any(|(_, f)| *f == field) {
                    mapping.entries.push((header.clone(), field));
                }
            }
        }
    }

    mapping
}

// Cabeçalhos fixos conhecidos por plataforma.
fn template_field(platform: Platform, header: &str) -> Option<CanonicalField> {
    let normalized = normalize_header(header);
    let table: &[(&str, CanonicalField)] = match platform {
        Platform::Meta => &[
            ("day", CanonicalField::Date),
            ("campaign name", CanonicalField::CampaignName),
            ("amount spent idr", CanonicalField::Spend),
            ("impressions", CanonicalField::Impressions),
            ("link clicks", CanonicalField::Clicks),
            ("reach", CanonicalField::Reach),
            ("results", CanonicalField::Leads),
        ],
        Platform::Google => &[
            ("day", CanonicalField::Date),
            ("campaign", CanonicalField::CampaignName),
            ("cost", CanonicalField::Spend),
            ("impr", CanonicalField::Impressions),
            ("interactions", CanonicalField::Clicks),
            ("conversions", CanonicalField::Leads),
        ],
        Platform::Tiktok => &[
            ("date", CanonicalField::Date),
            ("campaign name", CanonicalField::CampaignName),
            ("total cost", CanonicalField::Spend),
            ("impressions", CanonicalField::Impressions),
            ("clicks destination", CanonicalField::Clicks),
            ("conversions", CanonicalField::Leads),
        ],
        _ => &[],
    };

    table.iter().find(|(known, _)| *known == normalized).map(|(_, f)| *f)
}

/// Resolve o valor de um campo canônico dentro de uma linha crua da
/// planilha (caminho da ingestão). Primeiro par chave/valor cujo cabeçalho
/// casar com o campo vence.
pub fn resolve_row_value<'a>(
    row: &'a Map<String, Value>,
    field: CanonicalField,
) -> Option<&'a Value> {
    row.iter()
        .find(|(key, _)| match_header(key) == Some(field))
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normaliza_separadores_e_caixa() {
        assert_eq!(normalize_header("  Amount_spent (IDR) "), "amount spent idr");
        assert_eq!(normalize_header("Campaign-Name"), "campaign name");
    }

    #[test]
    fn casa_cabecalhos_tipicos_do_meta() {
        assert_eq!(match_header("Day"), Some(CanonicalField::Date));
        assert_eq!(match_header("Campaign Name"), Some(CanonicalField::CampaignName));
        assert_eq!(match_header("Amount spent (IDR)"), Some(CanonicalField::Spend));
        assert_eq!(match_header("Impressions"), Some(CanonicalField::Impressions));
        assert_eq!(match_header("Link clicks"), Some(CanonicalField::Clicks));
        assert_eq!(match_header("Reach"), Some(CanonicalField::Reach));
    }

    #[test]
    fn ctr_e_cpc_nao_sao_engolidos_pelo_padrao_de_custo() {
        assert_eq!(match_header("CTR (%)"), Some(CanonicalField::Ctr));
        assert_eq!(match_header("CPC (cost per link click)"), Some(CanonicalField::Cpc));
    }

    #[test]
    fn primeiro_cabecalho_reivindica_o_campo() {
        let mapping = map_headers(&headers(&["Spend", "Amount spent (IDR)", "Campaign"]));
        // Só um dos dois cabeçalhos de gasto entra no mapeamento.
        assert_eq!(mapping.matched(), 2);
        assert_eq!(mapping.entries[0].0, "Spend");
        assert_eq!(mapping.entries[0].1, CanonicalField::Spend);
    }

    #[test]
    fn rejeita_planilha_sem_padrao_reconhecivel() {
        let result = validate_headers(&headers(&["foo", "bar", "baz", "qux", "quux"]));
        assert!(matches!(result, Err(AppError::InvalidColumns(_))));
    }

    #[test]
    fn aceita_export_padrao_do_meta() {
        let mapping = validate_headers(&headers(&[
            "Date",
            "Campaign Name",
            "Amount spent (IDR)",
            "Impressions",
            "Link clicks",
        ]))
        .expect("deveria aceitar 5/5 colunas reconhecidas");
        assert_eq!(mapping.matched(), 5);
        assert!(mapping.has_field(CanonicalField::CampaignName));
    }

    #[test]
    fn rejeita_sem_coluna_de_campanha_mesmo_com_boa_taxa() {
        let result = validate_headers(&headers(&["Date", "Spend", "Impressions", "Clicks"]));
        assert!(matches!(result, Err(AppError::InvalidColumns(_))));
    }

    #[test]
    fn rejeita_excesso_de_colunas_nao_reconhecidas() {
        // 10 reconhecíveis + 11 de lixo: a taxa (10/21) passa do limiar,
        // mas o teto absoluto de 10 não casadas derruba o arquivo.
        let mut cols = vec![
            "date", "campaign", "spend", "impressions", "clicks", "reach", "ctr", "cpc",
            "leads", "platform",
        ];
        let garbage: Vec<String> = (0..11).map(|i| format!("col{}", i)).collect();
        cols.extend(garbage.iter().map(|s| s.as_str()));
        let result = validate_headers(&headers(&cols));
        assert!(matches!(result, Err(AppError::InvalidColumns(_))));
    }

    #[test]
    fn template_da_plataforma_preenche_lacunas() {
        // "Interactions" não casa com nenhum regex; é o template do
        // Google que o reconhece como coluna de cliques.
        let mapping =
            detect_columns(&headers(&["Campaign", "Cost", "Interactions"]), Some(Platform::Google));
        assert!(mapping.has_field(CanonicalField::CampaignName));
        assert!(mapping.has_field(CanonicalField::Spend));
        assert!(mapping.has_field(CanonicalField::Clicks));

        // Sem plataforma, a lacuna permanece.
        let bare = detect_columns(&headers(&["Campaign", "Cost", "Interactions"]), None);
        assert!(!bare.has_field(CanonicalField::Clicks));
    }

    #[test]
    fn resolve_valor_na_linha_crua() {
        let row = json!({
            "Campaign Name": "Promo Maio",
            "Amount spent (IDR)": 1500.5,
            "Link clicks": 42
        });
        let row = row.as_object().unwrap();

        let name = resolve_row_value(row, CanonicalField::CampaignName).unwrap();
        assert_eq!(name.as_str(), Some("Promo Maio"));

        let clicks = resolve_row_value(row, CanonicalField::Clicks).unwrap();
        assert_eq!(clicks.as_i64(), Some(42));

        assert!(resolve_row_value(row, CanonicalField::Reach).is_none());
    }
}
