use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::RoleName;

/// A persisted identity. Never deleted in normal operation; disabled
/// accounts keep their row with `enabled = false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<RoleName>,
}

impl User {
    pub fn new(email: String, password_hash: String, roles: Vec<RoleName>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            enabled: true,
            created_at: Utc::now(),
            roles,
        }
    }

    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }
}
