use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role stored in `user.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Upload mods, post comments, ratings and tags.
    ModCreate,
    /// Approve or reject mods and view the moderation queue.
    ModApprove,
    /// Edit or delete any mod, not just one's own.
    ModModerateAny,
    /// Create categories, races and genders.
    CatalogManage,
    UserManage,
}

impl Role {
    /// The role assigned to newly registered users.
    pub const DEFAULT: Role = Role::User;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// The single authorization predicate used by every handler.
    pub fn allows(&self, permission: Permission) -> bool {
        match self {
            Role::Admin => true,
            Role::Moderator => matches!(
                permission,
                Permission::ModCreate | Permission::ModApprove | Permission::ModModerateAny
            ),
            Role::User => matches!(permission, Permission::ModCreate),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ModCreate => "mod:create",
            Permission::ModApprove => "mod:approve",
            Permission::ModModerateAny => "mod:moderate_any",
            Permission::CatalogManage => "catalog:manage",
            Permission::UserManage => "user:manage",
        }
    }

    pub const ALL: [Permission; 5] = [
        Permission::ModCreate,
        Permission::ModApprove,
        Permission::ModModerateAny,
        Permission::CatalogManage,
        Permission::UserManage,
    ];
}

/// Permission names granted to a role, as reported by `/auth/login` and `/auth/me`.
pub fn permission_names(role: Role) -> Vec<String> {
    Permission::ALL
        .iter()
        .filter(|p| role.allows(**p))
        .map(|p| p.as_str().to_string())
        .collect()
}
