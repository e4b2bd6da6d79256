mod api_key;
mod none;
mod traits;
mod types;

pub use api_key::ApiKeyAuthenticator;
pub use none::NoneAuthenticator;
pub use traits::{AuthError, Authenticator};
pub use types::{Actor, AuthRequest, StaffDirectory};

use crate::config::{AuthConfig, AuthMethod};

/// Create an authenticator from configuration.
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    let directory = StaffDirectory::new(&config.staff_account_ids, &config.staff_role_ids);

    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new(directory))),
        AuthMethod::ApiKey => {
            let key = config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    AuthError::ConfigurationError(
                        "api_key auth method requires a configured key".to_string(),
                    )
                })?;
            Ok(Box::new(ApiKeyAuthenticator::new(key, directory)))
        }
    }
}
