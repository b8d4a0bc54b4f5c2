// src/models/campaign.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE platform do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "platform", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Meta,
    Google,
    Tiktok,
    Shopee,
    Tokopedia,
    Other,
}

impl Platform {
    /// Classifica um rótulo livre de plataforma ("Facebook Ads", "ig story"...)
    /// em um dos seis valores do enum. Função total e determinística.
    ///
    /// A ORDEM das regras faz parte do contrato: a primeira que casar vence.
    /// Quem estender a lista deve preservar essa ordem.
    pub fn classify(label: &str) -> Platform {
        let label = label.to_lowercase();

        if label.contains("meta") || label.contains("facebook") || label.contains("ig") {
            Platform::Meta
        } else if label.contains("google") || label.contains("youtube") {
            Platform::Google
        } else if label.contains("tiktok") {
            Platform::Tiktok
        } else if label.contains("shopee") {
            Platform::Shopee
        } else if label.contains("tokopedia") {
            Platform::Tokopedia
        } else {
            Platform::Other
        }
    }

    /// Plataforma efetiva de uma criação manual (campanha ou gasto avulso).
    /// `classify` só recebe rótulos de planilha; nome de campanha não é
    /// rótulo ("Big Sale" casaria com a regra "ig"). Sem rótulo, Other.
    pub fn for_manual_entry(requested: Option<Platform>) -> Platform {
        requested.unwrap_or(Platform::Other)
    }
}

// --- CAMPANHA ---

// Identidade canônica: (client_id, original_name) é único por tenant.
// `name` é editável; `original_name` nunca muda depois da criação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub client_id: Uuid,

    pub name: String,
    pub original_name: String,

    pub platform: Platform,

    // Nomes antigos absorvidos por merges.
    pub aliases: Vec<String>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Campanha com os contadores de dependentes, para listagem e
// como resposta do merge.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignWithCounts {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub original_name: String,
    pub platform: Platform,
    pub aliases: Vec<String>,
    pub is_active: bool,
    pub spend_count: i64,
    pub lead_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignPayload {
    pub client_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Promo Dia das Mães - Conversão")]
    pub name: String,

    pub platform: Option<Platform>,
}

// Correção pontual: renomear e/ou corrigir a plataforma.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    pub platform: Option<Platform>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeCampaignsPayload {
    pub client_id: Option<Uuid>,

    pub target_id: Uuid,

    #[validate(length(min = 1, message = "Informe pelo menos uma campanha de origem."))]
    pub source_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifica_variacoes_de_meta() {
        assert_eq!(Platform::classify("Facebook Ads"), Platform::Meta);
        assert_eq!(Platform::classify("META"), Platform::Meta);
        assert_eq!(Platform::classify("ig story"), Platform::Meta);
    }

    #[test]
    fn classifica_outras_plataformas() {
        assert_eq!(Platform::classify("Google Ads"), Platform::Google);
        assert_eq!(Platform::classify("YouTube"), Platform::Google);
        assert_eq!(Platform::classify("TikTok Ads Manager"), Platform::Tiktok);
        assert_eq!(Platform::classify("shopee ads"), Platform::Shopee);
        assert_eq!(Platform::classify("Tokopedia"), Platform::Tokopedia);
    }

    #[test]
    fn rotulo_desconhecido_vira_other() {
        assert_eq!(Platform::classify("unknown source"), Platform::Other);
        assert_eq!(Platform::classify(""), Platform::Other);
    }

    #[test]
    fn entrada_manual_sem_rotulo_fica_other() {
        // "Big Sale" contém "ig": se o nome passasse pelo classify,
        // a campanha nasceria Meta e sujaria o agregado por plataforma.
        assert_eq!(Platform::classify("Big Sale"), Platform::Meta);
        assert_eq!(Platform::for_manual_entry(None), Platform::Other);
        assert_eq!(Platform::for_manual_entry(Some(Platform::Google)), Platform::Google);
    }

    #[test]
    fn primeira_regra_vence() {
        // "meta" aparece antes de "google" na cadeia de regras.
        assert_eq!(Platform::classify("meta + google mix"), Platform::Meta);
    }
}
