// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, UserRepository},
    models::auth::{Claims, Role, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    client_repo: ClientRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        client_repo: ClientRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, client_repo, jwt_secret, pool }
    }

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
        client_id: Option<Uuid>,
    ) -> Result<String, AppError> {
        // O hashing fica fora da transação (não toca no banco) e num
        // thread separado, pois o bcrypt é CPU-bound.
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let role = registration_role(role)?;

        // Todo perfil registrável precisa nascer amarrado a um tenant.
        if client_id.is_none() {
            return Err(AppError::MissingClientId);
        }

        let mut tx = self.pool.begin().await?;

        // Valida o tenant dentro da mesma transação que cria o usuário.
        if let Some(cid) = client_id {
            self.client_repo
                .find_by_id(&mut *tx, cid)
                .await?
                .ok_or(AppError::NotFound("Cliente"))?;
        }

        let new_user = self
            .user_repo
            .create_user(&mut *tx, email, &hashed_password, role, client_id)
            .await?;

        tx.commit().await?;

        tracing::info!("✅ Usuário {} registrado como {:?}", new_user.email, new_user.role);
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

/// Perfil aceito no auto-registro. A rota é pública, então SUPER_ADMIN
/// jamais sai dela; esse perfil é provisionado direto no banco.
fn registration_role(requested: Option<Role>) -> Result<Role, AppError> {
    match requested.unwrap_or(Role::ClientAdmin) {
        Role::SuperAdmin => Err(AppError::AccessDenied),
        role => Ok(role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_registro_nao_emite_super_admin() {
        assert!(matches!(
            registration_role(Some(Role::SuperAdmin)),
            Err(AppError::AccessDenied)
        ));
    }

    #[test]
    fn auto_registro_usa_client_admin_como_padrao() {
        assert_eq!(registration_role(None).unwrap(), Role::ClientAdmin);
        assert_eq!(registration_role(Some(Role::Cs)).unwrap(), Role::Cs);
    }
}
