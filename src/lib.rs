pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod products;
pub mod session;
pub mod validation;

pub use db::DbPool;
pub use error::CoreError;
pub use session::Session;
