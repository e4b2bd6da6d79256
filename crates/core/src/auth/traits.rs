use async_trait::async_trait;
use thiserror::Error;

use super::types::{Actor, AuthRequest};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate a request and return the acting account
    async fn authenticate(&self, request: &AuthRequest) -> Result<Actor, AuthError>;

    /// Name of this authentication method
    fn method_name(&self) -> &'static str;
}
