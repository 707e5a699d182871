use std::collections::HashSet;

use super::role::{Permission, RoleName};

/// The per-request identity context produced by the token
/// authentication middleware and passed explicitly through request
/// extensions. Endpoint-level checks consult this value rather than
/// any ambient global state.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: String,
    pub authorities: HashSet<String>,
}

impl AuthContext {
    pub fn new(subject: String, authorities: HashSet<String>) -> Self {
        Self {
            subject,
            authorities,
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    pub fn has_role(&self, role: RoleName) -> bool {
        self.authorities.contains(&format!("ROLE_{}", role.as_str()))
    }

    pub fn has_any_role(&self, roles: &[RoleName]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.authorities.contains(permission.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::authorities_of;

    #[test]
    fn role_and_permission_checks() {
        let ctx = AuthContext::new(
            "a@x.com".to_string(),
            authorities_of(&[RoleName::EventManager]),
        );
        assert!(ctx.has_role(RoleName::EventManager));
        assert!(!ctx.has_role(RoleName::Admin));
        assert!(ctx.has_permission(Permission::CreateEvent));
        assert!(!ctx.has_permission(Permission::AdminDashboard));
        assert!(ctx.has_any_role(&[RoleName::Admin, RoleName::EventManager]));
        assert!(!ctx.has_any_role(&[RoleName::Admin]));
    }
}
