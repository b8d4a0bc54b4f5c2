// src/middleware/tenancy.rs

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// Query string padrão das rotas escopadas por tenant.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub client_id: Option<Uuid>,
}

/// Decide em qual tenant uma operação roda.
///
/// SUPER_ADMIN opera em nome de qualquer client, mas SEMPRE de forma
/// explícita: sem `clientId` no request a chamada falha, nunca cai num
/// client "qualquer". Os demais perfis ficam presos ao próprio tenant;
/// pedir outro é AccessDenied (e não um silencioso ignore).
pub fn resolve_client_scope(user: &User, requested: Option<Uuid>) -> Result<Uuid, AppError> {
    if user.is_super_admin() {
        return requested.ok_or(AppError::MissingClientId);
    }

    let own = user.client_id.ok_or(AppError::AccessDenied)?;

    match requested {
        Some(asked) if asked != own => Err(AppError::AccessDenied),
        _ => Ok(own),
    }
}

/// Operações destrutivas sobre o catálogo (merge e exclusão de campanha)
/// exigem perfil administrador. CS opera leads e leituras, nunca o catálogo.
pub fn require_admin(user: &User) -> Result<(), AppError> {
    match user.role {
        Role::Cs => Err(AppError::AccessDenied),
        Role::SuperAdmin | Role::ClientAdmin => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role, client_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "teste@exemplo.com".to_string(),
            password_hash: String::new(),
            role,
            client_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn super_admin_sem_client_id_explicito_e_rejeitado() {
        let admin = user(Role::SuperAdmin, None);
        assert!(matches!(
            resolve_client_scope(&admin, None),
            Err(AppError::MissingClientId)
        ));
    }

    #[test]
    fn super_admin_opera_no_client_pedido() {
        let admin = user(Role::SuperAdmin, None);
        let target = Uuid::new_v4();
        assert_eq!(resolve_client_scope(&admin, Some(target)).unwrap(), target);
    }

    #[test]
    fn perfil_comum_fica_preso_ao_proprio_tenant() {
        let own = Uuid::new_v4();
        let cs = user(Role::Cs, Some(own));
        assert_eq!(resolve_client_scope(&cs, None).unwrap(), own);
        assert_eq!(resolve_client_scope(&cs, Some(own)).unwrap(), own);
    }

    #[test]
    fn pedir_outro_tenant_e_access_denied() {
        let cs = user(Role::ClientAdmin, Some(Uuid::new_v4()));
        assert!(matches!(
            resolve_client_scope(&cs, Some(Uuid::new_v4())),
            Err(AppError::AccessDenied)
        ));
    }

    #[test]
    fn cs_nao_administra_o_catalogo() {
        let cs = user(Role::Cs, Some(Uuid::new_v4()));
        assert!(matches!(require_admin(&cs), Err(AppError::AccessDenied)));

        let admin = user(Role::ClientAdmin, Some(Uuid::new_v4()));
        assert!(require_admin(&admin).is_ok());
        assert!(require_admin(&user(Role::SuperAdmin, None)).is_ok());
    }

    #[test]
    fn perfil_comum_sem_tenant_nao_opera() {
        let orfao = user(Role::Cs, None);
        assert!(matches!(
            resolve_client_scope(&orfao, None),
            Err(AppError::AccessDenied)
        ));
    }
}
