//! User role assigned by the gateway.

use serde::{Deserialize, Serialize};

/// Role granted to an authenticated user.
///
/// The gateway reports roles as a list of strings on login; the session keeps
/// the single effective role. A user is an admin if any granted role is
/// `"ADMIN"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular customer account.
    #[default]
    User,
    /// Administrator with access to batch and user management.
    Admin,
}

impl Role {
    /// Resolve the effective role from the gateway's granted-roles list.
    #[must_use]
    pub fn from_granted(roles: &[String]) -> Self {
        if roles.iter().any(|r| r == "ADMIN") {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// The stored string form (`"ADMIN"` / `"USER"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Post-login landing path for this role.
    #[must_use]
    pub const fn redirect_target(&self) -> &'static str {
        match self {
            Self::User => "/",
            Self::Admin => "/admin/dashboard",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized role string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_granted_admin() {
        let roles = vec!["USER".to_owned(), "ADMIN".to_owned()];
        assert_eq!(Role::from_granted(&roles), Role::Admin);
    }

    #[test]
    fn test_from_granted_user() {
        let roles = vec!["USER".to_owned()];
        assert_eq!(Role::from_granted(&roles), Role::User);
    }

    #[test]
    fn test_from_granted_empty() {
        assert_eq!(Role::from_granted(&[]), Role::User);
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(Role::Admin.redirect_target(), "/admin/dashboard");
        assert_eq!(Role::User.redirect_target(), "/");
    }

    #[test]
    fn test_round_trip_str() {
        for role in [Role::User, Role::Admin] {
            let parsed: Role = role.as_str().parse().expect("parse role");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_serde_screaming_case() {
        let json = serde_json::to_string(&Role::Admin).expect("serialize role");
        assert_eq!(json, "\"ADMIN\"");
    }
}
