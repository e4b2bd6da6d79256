use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

/// Header carrying the acting account id, supplied by the trusted frontend.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the actor's comma-separated role ids.
pub const ACTOR_ROLES_HEADER: &str = "x-actor-roles";

/// Request information for authentication
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub headers: HashMap<String, String>,
    pub source_ip: IpAddr,
}

/// Authenticated actor: the platform account issuing a command.
///
/// The identity platform in front of this service resolves who is speaking
/// and which roles they hold; this type captures only what the workflow
/// needs: the account id and whether the actor counts as staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub account_id: String,
    pub staff: bool,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self {
            account_id: "anonymous".to_string(),
            staff: false,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.account_id == "anonymous"
    }
}

/// Configured sets of staff account ids and staff role ids.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    account_ids: HashSet<String>,
    role_ids: HashSet<String>,
}

impl StaffDirectory {
    pub fn new(account_ids: &[String], role_ids: &[String]) -> Self {
        Self {
            account_ids: account_ids.iter().cloned().collect(),
            role_ids: role_ids.iter().cloned().collect(),
        }
    }

    /// Resolve the actor described by the request headers.
    ///
    /// A request without an actor id resolves to the anonymous non-staff
    /// actor rather than failing; staff-gated operations reject it later.
    pub fn resolve(&self, request: &AuthRequest) -> Actor {
        let account_id = match request.headers.get(ACTOR_ID_HEADER) {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => return Actor::anonymous(),
        };

        let staff = self.account_ids.contains(&account_id)
            || request
                .headers
                .get(ACTOR_ROLES_HEADER)
                .map(|roles| {
                    roles
                        .split(',')
                        .map(str::trim)
                        .any(|role| !role.is_empty() && self.role_ids.contains(role))
                })
                .unwrap_or(false);

        Actor { account_id, staff }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn request(headers: &[(&str, &str)]) -> AuthRequest {
        AuthRequest {
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            source_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }

    #[test]
    fn missing_actor_id_resolves_anonymous() {
        let directory = StaffDirectory::default();
        let actor = directory.resolve(&request(&[]));
        assert!(actor.is_anonymous());
        assert!(!actor.staff);
    }

    #[test]
    fn staff_by_account_id() {
        let directory = StaffDirectory::new(&["42".to_string()], &[]);
        let actor = directory.resolve(&request(&[(ACTOR_ID_HEADER, "42")]));
        assert_eq!(actor.account_id, "42");
        assert!(actor.staff);
    }

    #[test]
    fn staff_by_role_id() {
        let directory = StaffDirectory::new(&[], &["900".to_string()]);
        let actor = directory.resolve(&request(&[
            (ACTOR_ID_HEADER, "7"),
            (ACTOR_ROLES_HEADER, "100, 900"),
        ]));
        assert!(actor.staff);
    }

    #[test]
    fn non_staff_without_matching_role() {
        let directory = StaffDirectory::new(&[], &["900".to_string()]);
        let actor = directory.resolve(&request(&[
            (ACTOR_ID_HEADER, "7"),
            (ACTOR_ROLES_HEADER, "100,101"),
        ]));
        assert!(!actor.staff);
    }

    #[test]
    fn actor_serialization_round_trip() {
        let actor = Actor {
            account_id: "user123".to_string(),
            staff: true,
        };
        let json = serde_json::to_string(&actor).unwrap();
        let deserialized: Actor = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.account_id, "user123");
        assert!(deserialized.staff);
    }
}
