// src/services/campaign_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CampaignRepository, LeadRepository, SpendRepository},
    models::campaign::{Campaign, CampaignWithCounts, Platform},
};

#[derive(Clone)]
pub struct CampaignService {
    campaign_repo: CampaignRepository,
    spend_repo: SpendRepository,
    lead_repo: LeadRepository,
    pool: PgPool,
}

impl CampaignService {
    pub fn new(
        campaign_repo: CampaignRepository,
        spend_repo: SpendRepository,
        lead_repo: LeadRepository,
        pool: PgPool,
    ) -> Self {
        Self { campaign_repo, spend_repo, lead_repo, pool }
    }

    // =========================================================================
    //  RESOLUÇÃO DE IDENTIDADE
    // =========================================================================

    /// Resolve (client_id, nome) para a campanha canônica do tenant,
    /// criando-a na primeira aparição. Retorna também se ela é nova.
    ///
    /// Seguro sob importações concorrentes: o read-then-create é protegido
    /// pelo índice único em (client_id, original_name). Se o INSERT perder
    /// a corrida, refazemos o SELECT em vez de propagar o erro.
    pub async fn find_or_create(
        &self,
        client_id: Uuid,
        name: &str,
        platform: Platform,
    ) -> Result<(Campaign, bool), AppError> {
        if let Some(existing) = self
            .campaign_repo
            .find_by_original_name(client_id, name)
            .await?
        {
            return Ok((existing, false));
        }

        match self.campaign_repo.try_insert(client_id, name, platform).await? {
            Some(created) => Ok((created, true)),
            None => {
                // Outra importação criou a mesma campanha entre o SELECT
                // e o INSERT. Ela tem que existir agora.
                let existing = self
                    .campaign_repo
                    .find_by_original_name(client_id, name)
                    .await?
                    .ok_or(AppError::NotFound("Campanha"))?;
                Ok((existing, false))
            }
        }
    }

    // =========================================================================
    //  MERGE DE DUPLICADAS
    // =========================================================================

    /// Consolida campanhas duplicadas: aliases das origens vão para o alvo,
    /// spend logs e leads são reapontados e as origens são apagadas —
    /// tudo em UMA transação. Merge parcial é violação de correção.
    pub async fn merge(
        &self,
        client_id: Uuid,
        target_id: Uuid,
        source_ids: &[Uuid],
    ) -> Result<CampaignWithCounts, AppError> {
        validate_merge_request(target_id, source_ids)?;

        // Pré-checagem fora da transação: tudo precisa existir e pertencer
        // ao tenant do chamador. Nada foi mutado até aqui (fail fast).
        let target = self
            .campaign_repo
            .find_by_id(client_id, target_id)
            .await?
            .ok_or(AppError::NotFound("Campanha"))?;

        let sources = self.campaign_repo.find_many(client_id, source_ids).await?;
        if sources.len() != source_ids.len() {
            return Err(AppError::NotFound("Campanha"));
        }

        let aliases = collect_merge_aliases(&target, &sources);

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        self.campaign_repo.set_aliases(&mut *tx, target_id, &aliases).await?;

        let spend_moved =
            self.spend_repo.reassign_campaign(&mut *tx, source_ids, target_id).await?;
        let leads_moved =
            self.lead_repo.reassign_campaign(&mut *tx, source_ids, target_id).await?;

        self.campaign_repo.delete_many(&mut *tx, client_id, source_ids).await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(
            "🔀 Merge de {} campanha(s) em {}: {} spend logs e {} leads reapontados.",
            sources.len(),
            target.name,
            spend_moved,
            leads_moved
        );

        self.campaign_repo
            .find_with_counts(client_id, target_id)
            .await?
            .ok_or(AppError::NotFound("Campanha"))
    }

    // =========================================================================
    //  CRUD
    // =========================================================================

    pub async fn create(
        &self,
        client_id: Uuid,
        name: &str,
        platform: Platform,
    ) -> Result<Campaign, AppError> {
        match self.campaign_repo.try_insert(client_id, name, platform).await? {
            Some(created) => Ok(created),
            None => Err(AppError::UniqueConstraintViolation(format!(
                "A campanha '{}' já existe para este cliente.",
                name
            ))),
        }
    }

    pub async fn list(&self, client_id: Uuid) -> Result<Vec<CampaignWithCounts>, AppError> {
        self.campaign_repo.list_with_counts(client_id).await
    }

    pub async fn update(
        &self,
        client_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        platform: Option<Platform>,
        is_active: Option<bool>,
    ) -> Result<Campaign, AppError> {
        self.campaign_repo
            .update(client_id, id, name, platform, is_active)
            .await?
            .ok_or(AppError::NotFound("Campanha"))
    }

    /// Delete explícito de admin. O schema desvincula os dependentes
    /// (campaign_id vira NULL), preservando spend logs e leads.
    pub async fn delete(&self, client_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let deleted = self.campaign_repo.delete_many(&self.pool, client_id, &[id]).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Campanha"));
        }
        Ok(())
    }
}

/// Rejeita merges malformados antes de qualquer mutação.
fn validate_merge_request(target_id: Uuid, source_ids: &[Uuid]) -> Result<(), AppError> {
    if source_ids.is_empty() {
        return Err(AppError::MergeConflict(
            "Informe pelo menos uma campanha de origem.".to_string(),
        ));
    }
    if source_ids.contains(&target_id) {
        return Err(AppError::MergeConflict(
            "A campanha alvo não pode estar na lista de origens.".to_string(),
        ));
    }
    Ok(())
}

/// Junta [original_name, aliases...] de cada origem aos aliases do alvo.
/// Deduplicado preservando a ordem; o original_name do próprio alvo
/// nunca entra na lista.
fn collect_merge_aliases(target: &Campaign, sources: &[Campaign]) -> Vec<String> {
    let mut aliases = target.aliases.clone();

    for source in sources {
        for name in std::iter::once(&source.original_name).chain(source.aliases.iter()) {
            if *name != target.original_name && !aliases.contains(name) {
                aliases.push(name.clone());
            }
        }
    }

    aliases
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn campaign(name: &str, aliases: &[&str]) -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            name: name.to_string(),
            original_name: name.to_string(),
            platform: Platform::Meta,
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn merge_sem_origens_e_rejeitado() {
        let target = Uuid::new_v4();
        let result = validate_merge_request(target, &[]);
        assert!(matches!(result, Err(AppError::MergeConflict(_))));
    }

    #[test]
    fn alvo_na_lista_de_origens_e_rejeitado() {
        let target = Uuid::new_v4();
        let result = validate_merge_request(target, &[Uuid::new_v4(), target]);
        assert!(matches!(result, Err(AppError::MergeConflict(_))));
    }

    #[test]
    fn merge_valido_passa_na_pre_checagem() {
        assert!(validate_merge_request(Uuid::new_v4(), &[Uuid::new_v4()]).is_ok());
    }

    #[test]
    fn aliases_acumulam_original_name_e_aliases_das_origens() {
        let target = campaign("Promo A", &[]);
        let b = campaign("Promo B", &["Promo B velha"]);
        let c = campaign("Promo C", &[]);

        let aliases = collect_merge_aliases(&target, &[b, c]);
        assert_eq!(aliases, vec!["Promo B", "Promo B velha", "Promo C"]);
    }

    #[test]
    fn aliases_repetidos_sao_deduplicados() {
        let mut target = campaign("Promo A", &["Promo B"]);
        target.aliases.push("Promo X".to_string());

        let b = campaign("Promo B", &["Promo X"]);
        let aliases = collect_merge_aliases(&target, &[b]);
        // Nada duplicado, ordem preservada.
        assert_eq!(aliases, vec!["Promo B", "Promo X"]);
    }

    #[test]
    fn original_name_do_alvo_nunca_vira_alias() {
        let target = campaign("Promo A", &[]);
        let b = campaign("Promo B", &["Promo A"]);

        let aliases = collect_merge_aliases(&target, &[b]);
        assert_eq!(aliases, vec!["Promo B"]);
    }
}
