//! Portal user roles.

use serde::{Deserialize, Serialize};

use super::view::View;

/// Role of a signed-in portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// School administrator: manages accounts and settings.
    Admin,
    /// Teacher: manages classes, notes and assessments.
    Teacher,
    /// Student: views coursework and results.
    Student,
    /// Parent or guardian: monitors a child's progress and pays fees.
    Parent,
}

impl Role {
    /// Every role.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Teacher, Self::Student, Self::Parent];

    /// The role's name as stored and sent to the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Parent => "parent",
        }
    }

    /// Capitalized name for display in the profile badge.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Teacher => "Teacher",
            Self::Student => "Student",
            Self::Parent => "Parent",
        }
    }

    /// The dashboard view named after this role.
    #[must_use]
    pub const fn dashboard(self) -> View {
        match self {
            Self::Admin => View::Admin,
            Self::Teacher => View::Teacher,
            Self::Student => View::Student,
            Self::Parent => View::Parent,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct ParseRoleError(pub String);

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            "parent" => Ok(Self::Parent),
            _ => Err(ParseRoleError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("Admin".parse::<Role>().is_err());
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn test_dashboard_matches_role_name() {
        for role in Role::ALL {
            assert_eq!(role.dashboard().as_str(), role.as_str());
        }
    }

    #[test]
    fn test_display_name_is_capitalized() {
        assert_eq!(Role::Parent.display_name(), "Parent");
    }
}
