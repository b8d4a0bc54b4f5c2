// src/services/spend_service.rs

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SpendRepository,
    models::{
        campaign::Platform,
        spend::{CreateSpendLogPayload, SpendLog, UpdateSpendLogPayload},
    },
    services::campaign_service::CampaignService,
};

#[derive(Clone)]
pub struct SpendService {
    repo: SpendRepository,
    campaign_service: CampaignService,
}

impl SpendService {
    pub fn new(repo: SpendRepository, campaign_service: CampaignService) -> Self {
        Self { repo, campaign_service }
    }

    /// Entrada manual: passa pela MESMA resolução de identidade de campanha
    /// que a importação, para o registro avulso não criar duplicata.
    pub async fn create(
        &self,
        client_id: Uuid,
        payload: CreateSpendLogPayload,
    ) -> Result<SpendLog, AppError> {
        let platform = Platform::for_manual_entry(payload.platform);

        let (campaign, _created) = self
            .campaign_service
            .find_or_create(client_id, &payload.campaign_name, platform)
            .await?;

        let spend = Decimal::from_f64(payload.spend).unwrap_or(Decimal::ZERO);

        self.repo
            .insert(
                client_id,
                payload.date,
                Some(campaign.id),
                &payload.campaign_name,
                platform,
                spend,
                payload.impressions,
                payload.clicks,
                payload.reach,
                None,
                None,
            )
            .await
    }

    pub async fn list(
        &self,
        client_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        platform: Option<Platform>,
    ) -> Result<Vec<SpendLog>, AppError> {
        self.repo.list(client_id, start_date, end_date, platform).await
    }

    pub async fn update(
        &self,
        client_id: Uuid,
        id: Uuid,
        payload: UpdateSpendLogPayload,
    ) -> Result<SpendLog, AppError> {
        let spend = payload.spend.and_then(Decimal::from_f64);

        self.repo
            .update(
                client_id,
                id,
                payload.date,
                payload.platform,
                payload.campaign_id,
                spend,
                payload.impressions,
                payload.clicks,
                payload.reach,
            )
            .await?
            .ok_or(AppError::NotFound("Spend log"))
    }

    pub async fn delete(&self, client_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let affected = self.repo.delete(client_id, id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Spend log"));
        }
        Ok(())
    }
}
