//! Wellness Guide Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod stats;
pub mod token;

pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};
pub use routes::router;

use security::PasswordHasher;
use token::TokenService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Db,
    pub config: Config,
    pub tokens: TokenService,
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(pool: Db, config: Config) -> Self {
        let tokens = TokenService::new(&config.secret_key, config.access_token_expire_minutes);
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        Self {
            pool,
            config,
            tokens,
            hasher,
        }
    }
}
