// src/services/client_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::ClientRepository,
    models::{auth::User, client::Client},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    pool: PgPool,
}

impl ClientService {
    pub fn new(repo: ClientRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create(&self, name: &str) -> Result<Client, AppError> {
        let client = self.repo.create(name).await?;
        tracing::info!("✅ Client '{}' criado ({})", client.name, client.id);
        Ok(client)
    }

    /// SUPER_ADMIN enxerga todos os clients; os demais perfis recebem uma
    /// lista com no máximo o próprio tenant.
    pub async fn list_visible(&self, user: &User) -> Result<Vec<Client>, AppError> {
        if user.is_super_admin() {
            return self.repo.list_all().await;
        }
        let Some(own_id) = user.client_id else {
            return Ok(Vec::new());
        };
        let own = self.repo.find_by_id(&self.pool, own_id).await?;
        Ok(own.into_iter().collect())
    }
}
