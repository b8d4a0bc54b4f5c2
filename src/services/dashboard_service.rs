// src/services/dashboard_service.rs

use serde_json::{json, Value};
use uuid::Uuid;

use crate::{common::error::AppError, db::DashboardRepository, models::analytics::DashboardConfig};

/// Métricas visíveis quando o client ainda não personalizou nada.
const DEFAULT_METRICS: [&str; 8] =
    ["spend", "impressions", "clicks", "leads", "ctr", "cpc", "cpl", "roas"];

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    /// Criação preguiçosa: a primeira consulta de analytics do client
    /// materializa a config com o conjunto padrão de métricas.
    pub async fn get_or_create(&self, client_id: Uuid) -> Result<DashboardConfig, AppError> {
        if let Some(existing) = self.repo.find_by_client(client_id).await? {
            return Ok(existing);
        }
        let defaults = default_metrics_json();
        let created = self.repo.upsert_default(client_id, &defaults).await?;
        tracing::info!("✅ Dashboard config criado para client {}", client_id);
        Ok(created)
    }

    pub async fn update_metrics(
        &self,
        client_id: Uuid,
        metrics: Vec<String>,
    ) -> Result<DashboardConfig, AppError> {
        // Garante a existência antes do UPDATE (client pode nunca ter
        // aberto o analytics).
        self.get_or_create(client_id).await?;
        let config = self
            .repo
            .update_metrics(client_id, &json!(metrics))
            .await?
            .ok_or(AppError::NotFound("Dashboard config"))?;
        Ok(config)
    }
}

fn default_metrics_json() -> Value {
    json!(DEFAULT_METRICS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metricas_padrao_cobrem_funil_e_razoes() {
        let v = default_metrics_json();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 8);
        assert!(arr.contains(&json!("spend")));
        assert!(arr.contains(&json!("roas")));
    }
}
