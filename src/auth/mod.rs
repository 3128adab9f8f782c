//! Credential verification against stored user records.
//!
//! Unknown user and wrong password are indistinguishable from the
//! returned value; only the audit trail and logs record what happened.

pub mod permissions;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::db::{self, DbPool, User};
use crate::error::CoreError;
use permissions::{Capability, Role};

/// sha256 of the empty string; compared against when the user does not
/// exist so both failure paths do equivalent work.
const DUMMY_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Product of a successful credential check.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
    pub capabilities: &'static [Capability],
}

/// Deterministic one-way hash used for stored passwords (lowercase hex sha256).
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison of two password hashes.
fn hashes_match(supplied: &str, stored: &str) -> bool {
    let supplied = supplied.as_bytes();
    let stored = stored.as_bytes();
    supplied.len() == stored.len() && supplied.ct_eq(stored).into()
}

/// Verify a username/password pair and resolve the role's capabilities.
///
/// Every attempt, pass or fail, appends an audit row. A lookup fault
/// surfaces as `BackendUnavailable`, never as a denial.
pub async fn authenticate(
    db: &DbPool,
    username: &str,
    password: &str,
) -> Result<AuthenticatedUser, CoreError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(db)
        .await?;

    let supplied = hash_password(password);

    match user {
        Some(user) if hashes_match(&supplied, &user.password_hash) => {
            db::record_auth_attempt(db, username, db::outcomes::SUCCESS).await?;
            let role = Role::parse(&user.role);
            tracing::info!(username, role = %role, "successful login");
            Ok(AuthenticatedUser {
                username: user.username,
                role,
                capabilities: role.resolve(),
            })
        }
        user => {
            if user.is_none() {
                // Burn a comparison on the missing-user path too
                let _ = hashes_match(&supplied, DUMMY_HASH);
            }
            db::record_auth_attempt(db, username, db::outcomes::FAILURE).await?;
            tracing::warn!(username, "failed login attempt");
            Err(CoreError::AuthenticationDenied)
        }
    }
}

/// Seed the bootstrap admin account when the users table is empty.
///
/// Further provisioning happens out of band; this only makes a fresh
/// install reachable.
pub async fn ensure_admin_user(db: &DbPool, username: &str, password: &str) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query("INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, ?, ?)")
        .bind(username)
        .bind(hash_password(password))
        .bind(Role::Admin.as_str())
        .bind(&now)
        .execute(db)
        .await?;

    tracing::info!(username, "created bootstrap admin user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pool_with_user(username: &str, password: &str, role: &str) -> DbPool {
        let pool = crate::db::init_in_memory().await.unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(hash_password(password))
        .bind(role)
        .bind(&now)
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[test]
    fn test_hash_password_is_deterministic_sha256_hex() {
        assert_eq!(hash_password("secret"), hash_password("secret"));
        assert_ne!(hash_password("secret"), hash_password("Secret"));
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn test_authenticate_success_resolves_capabilities() {
        let pool = pool_with_user("alice", "s3cret", "admin").await;

        let user = authenticate(&pool, "alice", "s3cret").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Admin);
        assert!(user.capabilities.contains(&Capability::DeleteProduct));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_uniform() {
        let pool = pool_with_user("alice", "s3cret", "user").await;

        let wrong_password = authenticate(&pool, "alice", "nope").await.unwrap_err();
        let unknown_user = authenticate(&pool, "mallory", "nope").await.unwrap_err();

        assert_eq!(wrong_password, CoreError::AuthenticationDenied);
        assert_eq!(unknown_user, CoreError::AuthenticationDenied);
        assert_eq!(wrong_password, unknown_user);
    }

    #[tokio::test]
    async fn test_unknown_role_authenticates_with_empty_capabilities() {
        let pool = pool_with_user("bob", "pw", "operator").await;

        let user = authenticate(&pool, "bob", "pw").await.unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert!(user.capabilities.is_empty());
    }

    #[tokio::test]
    async fn test_every_attempt_is_audited() {
        let pool = pool_with_user("alice", "s3cret", "user").await;

        authenticate(&pool, "alice", "s3cret").await.unwrap();
        let _ = authenticate(&pool, "alice", "wrong").await;
        let _ = authenticate(&pool, "ghost", "wrong").await;

        let rows = db::list_auth_attempts(&pool, 10).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter()
                .filter(|r| r.outcome == db::outcomes::SUCCESS)
                .count(),
            1
        );
        assert_eq!(
            rows.iter()
                .filter(|r| r.outcome == db::outcomes::FAILURE)
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_ensure_admin_user_seeds_once() {
        let pool = crate::db::init_in_memory().await.unwrap();

        ensure_admin_user(&pool, "admin", "bootstrap").await.unwrap();
        // A second call must not overwrite or duplicate
        ensure_admin_user(&pool, "other", "different").await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);

        let admin = authenticate(&pool, "admin", "bootstrap").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
