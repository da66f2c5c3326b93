//! Role entity and the dual-typed role reference

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::registry::RoleContainer;
use crate::traversal::Descendants;

/// A named subject in the authorization graph
///
/// A role holds an immutable identifier, an ordered set of child-role
/// identifiers, and an explicit tri-state decision per permission name.
/// Child identifiers are plain strings resolved against a container at
/// query time; they may reference roles that do not (yet, or ever) exist.
///
/// # Examples
///
/// ```
/// use rbac::Role;
///
/// let mut editor = Role::new("editor");
/// editor.allow("article.edit").deny("article.delete");
///
/// assert_eq!(editor.is_granted("article.edit"), Some(true));
/// assert_eq!(editor.is_granted("article.delete"), Some(false));
/// assert_eq!(editor.is_granted("article.publish"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: String,

    /// Child identifiers in insertion order; insertion order is traversal order
    #[serde(default)]
    children: IndexSet<String>,

    /// Explicit decisions; an absent key means "no explicit decision"
    #[serde(default)]
    permissions: HashMap<String, bool>,
}

impl Role {
    /// Creates a role with the given identifier and no children or decisions
    ///
    /// Construction is infallible; identifier validity (non-empty, unique) is
    /// enforced when the role is registered into a container.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: IndexSet::new(),
            permissions: HashMap::new(),
        }
    }

    /// Returns the immutable role identifier
    pub fn role_id(&self) -> &str {
        &self.id
    }

    /// Appends a child-role identifier if not already listed
    ///
    /// Accepts an identifier or a role (its identifier is extracted).
    /// Re-adding an existing child is a no-op, not an error. This only
    /// records the identifier; nothing is checked against any container.
    pub fn add_child<'a>(&mut self, child: impl Into<RoleRef<'a>>) -> &mut Self {
        self.children.insert(child.into().role_id().to_string());
        self
    }

    /// Records an explicit "granted" decision for `permission`
    ///
    /// Overwrites any prior decision for that name.
    pub fn allow(&mut self, permission: impl Into<String>) -> &mut Self {
        self.permissions.insert(permission.into(), true);
        self
    }

    /// Records an explicit "denied" decision for `permission`
    ///
    /// Overwrites any prior decision for that name.
    pub fn deny(&mut self, permission: impl Into<String>) -> &mut Self {
        self.permissions.insert(permission.into(), false);
        self
    }

    /// Returns this role's own explicit decision for `permission`
    ///
    /// `Some(true)` granted, `Some(false)` denied, `None` unset. Never
    /// consults children; this is the base case of the resolution algorithm
    /// in [`crate::Rbac::is_granted`].
    pub fn is_granted(&self, permission: &str) -> Option<bool> {
        self.permissions.get(permission).copied()
    }

    /// Checks whether at least one listed child resolves in `container`
    ///
    /// Lazy, re-evaluated on each call against the container's current state.
    pub fn has_children(&self, container: &impl RoleContainer) -> bool {
        self.children.iter().any(|id| container.contains_role(id))
    }

    /// Returns the listed child identifiers in insertion order
    pub fn children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(String::as_str)
    }

    /// Returns the explicit permission decisions, in unspecified order
    pub fn permissions(&self) -> impl Iterator<Item = (&str, bool)> {
        self.permissions.iter().map(|(name, &d)| (name.as_str(), d))
    }

    /// Returns the cycle-guarded pre-order traversal of this role's
    /// descendants, dereferenced against `container` at iteration time
    pub fn descendants<'a, C: RoleContainer>(&'a self, container: &'a C) -> Descendants<'a, C> {
        Descendants::new(self, container)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<&str> for Role {
    fn from(id: &str) -> Self {
        Role::new(id)
    }
}

impl From<String> for Role {
    fn from(id: String) -> Self {
        Role::new(id)
    }
}

/// A role reference: either a bare identifier or a role value
///
/// Every operation accepting "a role" takes `impl Into<RoleRef<'_>>` and
/// normalizes both forms to an identifier at entry, so identifiers and role
/// values are interchangeable everywhere.
#[derive(Debug, Clone, Copy)]
pub enum RoleRef<'a> {
    Id(&'a str),
    Role(&'a Role),
}

impl<'a> RoleRef<'a> {
    /// Normalizes either form to the role identifier
    pub fn role_id(&self) -> &'a str {
        match self {
            RoleRef::Id(id) => id,
            RoleRef::Role(role) => role.role_id(),
        }
    }
}

impl<'a> From<&'a str> for RoleRef<'a> {
    fn from(id: &'a str) -> Self {
        RoleRef::Id(id)
    }
}

impl<'a> From<&'a String> for RoleRef<'a> {
    fn from(id: &'a String) -> Self {
        RoleRef::Id(id)
    }
}

impl<'a> From<&'a Role> for RoleRef<'a> {
    fn from(role: &'a Role) -> Self {
        RoleRef::Role(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Rbac;
    use test_case::test_case;

    #[test]
    fn test_role_id() {
        let role = Role::new("admin");
        assert_eq!(role.role_id(), "admin");
    }

    #[test]
    fn test_add_child_preserves_order() {
        let mut role = Role::new("parent");
        role.add_child("b").add_child("a").add_child("c");
        let children: Vec<&str> = role.children().collect();
        assert_eq!(children, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_add_child_duplicate_is_noop() {
        let mut role = Role::new("parent");
        role.add_child("a").add_child("b").add_child("a");
        let children: Vec<&str> = role.children().collect();
        assert_eq!(children, vec!["a", "b"]);
    }

    #[test]
    fn test_add_child_accepts_role_value() {
        let child = Role::new("child");
        let mut parent = Role::new("parent");
        parent.add_child(&child);
        assert_eq!(parent.children().collect::<Vec<_>>(), vec!["child"]);
    }

    #[test_case("read", true ; "allowed permission is granted")]
    #[test_case("write", false ; "denied permission is denied")]
    fn test_explicit_decision(permission: &str, expected: bool) {
        let mut role = Role::new("user");
        role.allow("read").deny("write");
        assert_eq!(role.is_granted(permission), Some(expected));
    }

    #[test]
    fn test_unset_permission_is_none() {
        let role = Role::new("user");
        assert_eq!(role.is_granted("anything"), None);
    }

    #[test]
    fn test_decision_overwrite() {
        let mut role = Role::new("user");
        role.allow("read");
        role.deny("read");
        assert_eq!(role.is_granted("read"), Some(false));
    }

    #[test]
    fn test_has_children_requires_resolvable_child() {
        let mut rbac = Rbac::new();
        rbac.add_role("child").unwrap();

        let mut role = Role::new("parent");
        role.add_child("missing");
        assert!(!role.has_children(&rbac));

        role.add_child("child");
        assert!(role.has_children(&rbac));
    }

    #[test]
    fn test_has_children_is_lazy() {
        let mut rbac = Rbac::new();
        let mut role = Role::new("parent");
        role.add_child("later");
        assert!(!role.has_children(&rbac));

        rbac.add_role("later").unwrap();
        assert!(role.has_children(&rbac));
    }

    #[test]
    fn test_role_ref_normalization() {
        let role = Role::new("admin");
        assert_eq!(RoleRef::from("admin").role_id(), "admin");
        assert_eq!(RoleRef::from(&role).role_id(), "admin");
        let owned = "admin".to_string();
        assert_eq!(RoleRef::from(&owned).role_id(), "admin");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut role = Role::new("editor");
        role.add_child("viewer").allow("edit").deny("publish");

        let json = serde_json::to_string(&role).unwrap();
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(role, back);
    }
}
