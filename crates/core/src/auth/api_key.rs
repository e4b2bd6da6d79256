use async_trait::async_trait;

use super::traits::{AuthError, Authenticator};
use super::types::{Actor, AuthRequest, StaffDirectory};

/// Authenticator requiring a shared API key before trusting the actor
/// headers. Accepts `Authorization: Bearer <key>` or `X-API-Key: <key>`.
pub struct ApiKeyAuthenticator {
    key: String,
    directory: StaffDirectory,
}

impl ApiKeyAuthenticator {
    pub fn new(key: String, directory: StaffDirectory) -> Self {
        Self { key, directory }
    }

    fn presented_key<'a>(&self, request: &'a AuthRequest) -> Option<&'a str> {
        if let Some(value) = request.headers.get("authorization") {
            if let Some(bearer) = value.strip_prefix("Bearer ") {
                return Some(bearer.trim());
            }
        }
        request.headers.get("x-api-key").map(|v| v.trim())
    }
}

#[async_trait]
impl Authenticator for ApiKeyAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Actor, AuthError> {
        match self.presented_key(request) {
            None => Err(AuthError::NotAuthenticated),
            Some(key) if key == self.key => Ok(self.directory.resolve(request)),
            Some(_) => Err(AuthError::InvalidCredentials(
                "API key does not match".to_string(),
            )),
        }
    }

    fn method_name(&self) -> &'static str {
        "api_key"
    }
}
