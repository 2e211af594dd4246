//! Role policy table: which views each role may open.

use std::collections::{BTreeMap, BTreeSet};

use school_portal_core::{Role, View};

/// Static mapping from role to permitted views.
///
/// Every standard entry includes the role's own dashboard view, which is
/// what bounds the router's redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    table: BTreeMap<Role, BTreeSet<View>>,
}

impl RolePolicy {
    /// The portal's standard permissions.
    #[must_use]
    pub fn standard() -> Self {
        use View::{Admin, Assignments, Cbt, Home, Notes, Parent, Payments, Reports, Student, Teacher, Timetable};

        Self::from_entries([
            (
                Role::Admin,
                vec![Home, Admin, Timetable, Assignments, Notes, Cbt, Reports, Payments],
            ),
            (
                Role::Teacher,
                vec![Home, Teacher, Timetable, Assignments, Notes, Cbt, Reports],
            ),
            (
                Role::Student,
                vec![Home, Student, Timetable, Assignments, Notes, Cbt, Reports, Payments],
            ),
            (Role::Parent, vec![Home, Parent, Timetable, Reports, Payments]),
        ])
    }

    /// Build a table from explicit entries. Roles left out have no permissions.
    pub fn from_entries<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, V)>,
        V: IntoIterator<Item = View>,
    {
        Self {
            table: entries
                .into_iter()
                .map(|(role, views)| (role, views.into_iter().collect()))
                .collect(),
        }
    }

    /// Views permitted for a stored role string.
    ///
    /// Returns `None` for a string that does not name a role in the table,
    /// which callers must treat as "not logged in".
    #[must_use]
    pub fn permitted_views(&self, role: &str) -> Option<&BTreeSet<View>> {
        self.for_role(role.parse().ok()?)
    }

    /// Views permitted for a role, if the table has an entry for it.
    #[must_use]
    pub fn for_role(&self, role: Role) -> Option<&BTreeSet<View>> {
        self.table.get(&role)
    }

    /// Whether `role` may open `view`.
    #[must_use]
    pub fn allows(&self, role: Role, view: View) -> bool {
        self.for_role(role).is_some_and(|views| views.contains(&view))
    }
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_may_open_its_dashboard() {
        let policy = RolePolicy::standard();
        for role in Role::ALL {
            assert!(policy.allows(role, role.dashboard()), "{role}");
            assert!(policy.allows(role, View::Home), "{role}");
            assert!(!policy.allows(role, View::Login), "{role}");
        }
    }

    #[test]
    fn test_parent_permissions() {
        let policy = RolePolicy::standard();
        let views: Vec<View> = policy.permitted_views("parent").unwrap().iter().copied().collect();
        assert_eq!(
            views,
            vec![View::Home, View::Parent, View::Timetable, View::Reports, View::Payments]
        );
        assert!(!policy.allows(Role::Parent, View::Assignments));
    }

    #[test]
    fn test_teacher_cannot_pay_fees() {
        let policy = RolePolicy::standard();
        assert!(!policy.allows(Role::Teacher, View::Payments));
        assert!(policy.allows(Role::Student, View::Payments));
        assert!(policy.allows(Role::Admin, View::Payments));
    }

    #[test]
    fn test_unknown_role_has_no_entry() {
        let policy = RolePolicy::standard();
        assert!(policy.permitted_views("janitor").is_none());
        assert!(policy.permitted_views("").is_none());
    }

    #[test]
    fn test_lookup_is_stable() {
        let policy = RolePolicy::standard();
        let first = policy.permitted_views("student").cloned();
        for _ in 0..3 {
            assert_eq!(policy.permitted_views("student").cloned(), first);
        }
    }

    #[test]
    fn test_missing_role_entry() {
        let policy = RolePolicy::from_entries([(Role::Admin, vec![View::Home, View::Admin])]);
        assert!(policy.for_role(Role::Teacher).is_none());
        assert!(!policy.allows(Role::Teacher, View::Home));
    }
}
