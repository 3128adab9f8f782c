//! Capability-gated facade over the product repository.
//!
//! There is no global session state: authentication yields a [`Session`]
//! value and every repository call goes through it. Dropping (or
//! explicitly logging out of) the session is the transition back to
//! unauthenticated. Each dispatch checks capability membership before the
//! repository is reached; the repository itself performs no authorization.

use crate::auth::{self, permissions::{Capability, Role}};
use crate::db::{self, AuditLog, DbPool, NewProduct, Product};
use crate::error::CoreError;
use crate::products;

#[derive(Debug)]
pub struct Session {
    db: DbPool,
    username: String,
    role: Role,
    capabilities: &'static [Capability],
}

impl Session {
    /// Authenticate and open a session. The only way to construct one.
    pub async fn login(db: &DbPool, username: &str, password: &str) -> Result<Session, CoreError> {
        let user = auth::authenticate(db, username, password).await?;
        Ok(Session {
            db: db.clone(),
            username: user.username,
            role: user.role,
            capabilities: user.capabilities,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        self.capabilities
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn require(&self, capability: Capability) -> Result<(), CoreError> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            tracing::warn!(
                username = %self.username,
                capability = %capability,
                "operation refused"
            );
            Err(CoreError::Unauthorized(capability))
        }
    }

    pub async fn create_product(&self, draft: &NewProduct) -> Result<i64, CoreError> {
        self.require(Capability::CreateProduct)?;
        products::create_product(&self.db, draft).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        self.require(Capability::ViewProduct)?;
        products::list_products(&self.db).await
    }

    pub async fn view_product(&self, id: i64) -> Result<Product, CoreError> {
        self.require(Capability::ViewProduct)?;
        products::get_product(&self.db, id).await
    }

    pub async fn update_product(&self, id: i64, field: &str, value: &str) -> Result<(), CoreError> {
        self.require(Capability::UpdateProduct)?;
        products::update_product(&self.db, id, field, value).await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), CoreError> {
        self.require(Capability::DeleteProduct)?;
        products::delete_product(&self.db, id).await
    }

    /// Recent authentication attempts, gated behind the settings area.
    pub async fn recent_auth_attempts(&self, limit: i64) -> Result<Vec<AuditLog>, CoreError> {
        self.require(Capability::Settings)?;
        let rows = db::list_auth_attempts(&self.db, limit).await?;
        Ok(rows)
    }

    /// Dropping the session is logging out; this just makes it explicit.
    pub fn logout(self) {
        tracing::info!(username = %self.username, "logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_pool() -> DbPool {
        let pool = crate::db::init_in_memory().await.unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        for (username, password, role) in [("boss", "adminpw", "admin"), ("viewer", "userpw", "user")] {
            sqlx::query(
                "INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(username)
            .bind(auth::hash_password(password))
            .bind(role)
            .bind(&now)
            .execute(&pool)
            .await
            .unwrap();
        }
        pool
    }

    fn valid_draft() -> NewProduct {
        NewProduct {
            product_name: "Gateway ECU".to_string(),
            fg_part: "SM1234567".to_string(),
            fg_part_rev: "003.03".to_string(),
            pcb_part: "SM2345678".to_string(),
            pcb_part_rev: "001.00".to_string(),
            smd_top: "SM3456789".to_string(),
            smd_top_rev: "002.01".to_string(),
            smd_bottom: "SM4567890".to_string(),
            smd_bottom_rev: "002.02".to_string(),
            sw_wrapper: "SM5678901".to_string(),
            sw_wrapper_rev: "010.00".to_string(),
            ecu_version: "01.02.03".to_string(),
            checksum: "77CB3BB0".to_string(),
            proto_number: Some("1278".to_string()),
            status: "Proto".to_string(),
            remark: String::new(),
        }
    }

    #[tokio::test]
    async fn test_login_failure_yields_no_session() {
        let pool = seeded_pool().await;
        let err = Session::login(&pool, "boss", "wrong").await.unwrap_err();
        assert_eq!(err, CoreError::AuthenticationDenied);
    }

    #[tokio::test]
    async fn test_user_role_can_view_but_not_mutate() {
        let pool = seeded_pool().await;
        let admin = Session::login(&pool, "boss", "adminpw").await.unwrap();
        let id = admin.create_product(&valid_draft()).await.unwrap();

        let viewer = Session::login(&pool, "viewer", "userpw").await.unwrap();
        assert!(viewer.list_products().await.is_ok());
        assert_eq!(viewer.view_product(id).await.unwrap().id, id);

        assert_eq!(
            viewer.create_product(&valid_draft()).await.unwrap_err(),
            CoreError::Unauthorized(Capability::CreateProduct)
        );
        assert_eq!(
            viewer.update_product(id, "status", "Released").await.unwrap_err(),
            CoreError::Unauthorized(Capability::UpdateProduct)
        );
        assert_eq!(
            viewer.delete_product(id).await.unwrap_err(),
            CoreError::Unauthorized(Capability::DeleteProduct)
        );
        assert_eq!(
            viewer.recent_auth_attempts(5).await.unwrap_err(),
            CoreError::Unauthorized(Capability::Settings)
        );

        // The refusal happened before the repository: the record is intact
        assert_eq!(admin.view_product(id).await.unwrap().status, "Proto");
    }

    #[tokio::test]
    async fn test_admin_full_lifecycle() {
        let pool = seeded_pool().await;
        let session = Session::login(&pool, "boss", "adminpw").await.unwrap();
        assert_eq!(session.role(), Role::Admin);

        let id = session.create_product(&valid_draft()).await.unwrap();

        session.update_product(id, "status", "Released").await.unwrap();
        assert_eq!(session.view_product(id).await.unwrap().status, "Released");

        let err = session.update_product(id, "fg_part", "BAD").await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { ref field, .. } if field == "fg_part"));
        // record unchanged after the rejected update
        assert_eq!(session.view_product(id).await.unwrap().fg_part, "SM1234567");

        session.delete_product(id).await.unwrap();
        assert_eq!(
            session.view_product(id).await.unwrap_err(),
            CoreError::NotFound(id)
        );

        let attempts = session.recent_auth_attempts(10).await.unwrap();
        assert!(!attempts.is_empty());

        session.logout();
    }
}
