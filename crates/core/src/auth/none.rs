use async_trait::async_trait;

use super::traits::{AuthError, Authenticator};
use super::types::{Actor, AuthRequest, StaffDirectory};

/// Authenticator that trusts the frontend-supplied actor headers without
/// verifying a shared key. Intended for development and for deployments where
/// the service is only reachable from the frontend.
pub struct NoneAuthenticator {
    directory: StaffDirectory,
}

impl NoneAuthenticator {
    pub fn new(directory: StaffDirectory) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Authenticator for NoneAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Actor, AuthError> {
        Ok(self.directory.resolve(request))
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::ACTOR_ID_HEADER;
    use std::collections::HashMap;
    use std::net::{IpAddr, Ipv4Addr};

    #[tokio::test]
    async fn resolves_actor_from_headers() {
        let auth = NoneAuthenticator::new(StaffDirectory::new(&["1".to_string()], &[]));
        let request = AuthRequest {
            headers: HashMap::from([(ACTOR_ID_HEADER.to_string(), "1".to_string())]),
            source_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let actor = auth.authenticate(&request).await.unwrap();
        assert_eq!(actor.account_id, "1");
        assert!(actor.staff);
    }
}
