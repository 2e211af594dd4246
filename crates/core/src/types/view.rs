//! Portal view identifiers.

use serde::{Deserialize, Serialize};

/// A named view (page section) of the portal.
///
/// The set is fixed: there is no dynamic registration of views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Login,
    Admin,
    Teacher,
    Student,
    Parent,
    Timetable,
    Assignments,
    Notes,
    Cbt,
    Reports,
    Payments,
}

impl View {
    /// Every view, in menu order.
    pub const ALL: [Self; 12] = [
        Self::Home,
        Self::Login,
        Self::Admin,
        Self::Teacher,
        Self::Student,
        Self::Parent,
        Self::Timetable,
        Self::Assignments,
        Self::Notes,
        Self::Cbt,
        Self::Reports,
        Self::Payments,
    ];

    /// The view's name as used in markup (`data-view`) and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Parent => "parent",
            Self::Timetable => "timetable",
            Self::Assignments => "assignments",
            Self::Notes => "notes",
            Self::Cbt => "cbt",
            Self::Reports => "reports",
            Self::Payments => "payments",
        }
    }

    /// Whether an anonymous visitor may see this view.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Home | Self::Login)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view: {0}")]
pub struct ParseViewError(pub String);

impl std::str::FromStr for View {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| ParseViewError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_view_name_round_trip() {
        for view in View::ALL {
            assert_eq!(view.as_str().parse::<View>().unwrap(), view);
        }
    }

    #[test]
    fn test_unknown_view_is_rejected() {
        let err = "gradebook".parse::<View>().unwrap_err();
        assert_eq!(err.to_string(), "unknown view: gradebook");
    }

    #[test]
    fn test_only_home_and_login_are_public() {
        let public: Vec<View> = View::ALL.into_iter().filter(|v| v.is_public()).collect();
        assert_eq!(public, vec![View::Home, View::Login]);
    }
}
