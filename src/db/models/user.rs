//! Credential record row type.
//!
//! Rows are provisioned out of band (or seeded at startup) and are
//! read-only to this crate's operations.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}
