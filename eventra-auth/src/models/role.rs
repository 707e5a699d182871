use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Roles assignable to an identity. Static reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    Admin,
    EventManager,
    User,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "ADMIN",
            RoleName::EventManager => "EVENT_MANAGER",
            RoleName::User => "USER",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RoleName::Admin => "Administrator - Full system access",
            RoleName::EventManager => "Event Manager - Can manage events and users",
            RoleName::User => "Regular User - Can view and participate in events",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(RoleName::Admin),
            "EVENT_MANAGER" => Ok(RoleName::EventManager),
            "USER" => Ok(RoleName::User),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Capability tags reachable through roles. Static reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    CreateEvent,
    EditEvent,
    DeleteEvent,
    ViewEvent,
    ManageEventParticipants,
    CreateUser,
    EditUser,
    DeleteUser,
    ViewUser,
    ManageUserRoles,
    AdminDashboard,
    SystemSettings,
    ViewAnalytics,
    ExportData,
    ManageContent,
    ModerateContent,
    ParticipateEvent,
    CreateFeedback,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateEvent => "CREATE_EVENT",
            Permission::EditEvent => "EDIT_EVENT",
            Permission::DeleteEvent => "DELETE_EVENT",
            Permission::ViewEvent => "VIEW_EVENT",
            Permission::ManageEventParticipants => "MANAGE_EVENT_PARTICIPANTS",
            Permission::CreateUser => "CREATE_USER",
            Permission::EditUser => "EDIT_USER",
            Permission::DeleteUser => "DELETE_USER",
            Permission::ViewUser => "VIEW_USER",
            Permission::ManageUserRoles => "MANAGE_USER_ROLES",
            Permission::AdminDashboard => "ADMIN_DASHBOARD",
            Permission::SystemSettings => "SYSTEM_SETTINGS",
            Permission::ViewAnalytics => "VIEW_ANALYTICS",
            Permission::ExportData => "EXPORT_DATA",
            Permission::ManageContent => "MANAGE_CONTENT",
            Permission::ModerateContent => "MODERATE_CONTENT",
            Permission::ParticipateEvent => "PARTICIPATE_EVENT",
            Permission::CreateFeedback => "CREATE_FEEDBACK",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role -> permission table. Loaded once, immutable.
pub fn permissions_for(role: RoleName) -> &'static [Permission] {
    match role {
        RoleName::Admin => &[
            Permission::CreateEvent,
            Permission::EditEvent,
            Permission::DeleteEvent,
            Permission::ViewEvent,
            Permission::ManageEventParticipants,
            Permission::CreateUser,
            Permission::EditUser,
            Permission::DeleteUser,
            Permission::ViewUser,
            Permission::ManageUserRoles,
            Permission::AdminDashboard,
            Permission::SystemSettings,
            Permission::ViewAnalytics,
            Permission::ExportData,
            Permission::ManageContent,
            Permission::ModerateContent,
        ],
        RoleName::EventManager => &[
            Permission::CreateEvent,
            Permission::EditEvent,
            Permission::DeleteEvent,
            Permission::ViewEvent,
            Permission::ManageEventParticipants,
        ],
        RoleName::User => &[
            Permission::ViewEvent,
            Permission::ParticipateEvent,
            Permission::CreateFeedback,
        ],
    }
}

/// Derive the flat authority set for a set of assigned roles: a
/// `ROLE_<NAME>` tag per role plus every permission name reachable
/// through those roles. An empty role slice yields an empty set.
pub fn authorities_of(roles: &[RoleName]) -> HashSet<String> {
    let mut authorities = HashSet::new();
    for role in roles {
        authorities.insert(format!("ROLE_{}", role.as_str()));
        for permission in permissions_for(*role) {
            authorities.insert(permission.as_str().to_string());
        }
    }
    authorities
}
