//! Role registry and the permission resolution entry point

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{RbacError, Result};
use crate::role::{Role, RoleRef};

/// The minimal lookup surface a role and the descendant traversal need
/// from a container
pub trait RoleContainer {
    /// Returns the registered role for `id`, if any
    fn role(&self, id: &str) -> Option<&Role>;

    /// Checks whether a role with `id` is registered
    fn contains_role(&self, id: &str) -> bool {
        self.role(id).is_some()
    }
}

/// Append-only role registry and permission resolver
///
/// Roles are stored under their identifier in registration order; there is
/// no removal operation. Resolution walks the descendant graph of the
/// queried role, so registering a child after a parent listed it is fine;
/// child identifiers are dereferenced at query time.
///
/// Mutation requires `&mut Rbac` and resolution takes `&Rbac`; a host that
/// shares a container across threads serializes access with its own lock.
///
/// # Examples
///
/// ```
/// use rbac::Rbac;
///
/// let mut rbac = Rbac::new();
/// rbac.add_role_with_children("admin", ["editor"]).unwrap();
/// rbac.add_role("editor").unwrap();
/// rbac.get_role_mut("editor").unwrap().allow("article.edit");
///
/// assert!(rbac.is_granted("admin", "article.edit"));
/// assert!(!rbac.is_granted("intruder", "article.edit"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rbac {
    roles: IndexMap<String, Role>,
}

impl Rbac {
    /// Creates an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a role under its identifier
    ///
    /// Accepts a role value or a bare identifier (auto-wrapped into a new
    /// role). Returns self for chaining.
    ///
    /// # Errors
    ///
    /// - [`RbacError::EmptyRoleId`] if the identifier is empty
    /// - [`RbacError::DuplicateRole`] if the identifier is already registered
    pub fn add_role(&mut self, role: impl Into<Role>) -> Result<&mut Self> {
        let role = role.into();

        if role.role_id().is_empty() {
            return Err(RbacError::EmptyRoleId);
        }
        if self.roles.contains_key(role.role_id()) {
            return Err(RbacError::DuplicateRole {
                role: role.role_id().to_string(),
            });
        }

        debug!(role = role.role_id(), "registered role");
        self.roles.insert(role.role_id().to_string(), role);
        Ok(self)
    }

    /// Registers a role and appends `children` in the given order
    ///
    /// Children are identifiers or role values; only their identifiers are
    /// recorded. They are not required to be registered, now or ever;
    /// unresolvable children are skipped at resolution time.
    ///
    /// # Errors
    ///
    /// Same as [`Rbac::add_role`].
    pub fn add_role_with_children<'a, I>(
        &mut self,
        role: impl Into<Role>,
        children: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Into<RoleRef<'a>>,
    {
        let mut role = role.into();
        for child in children {
            role.add_child(child);
        }
        self.add_role(role)
    }

    /// Checks whether the referenced role is registered; never fails
    pub fn has_role<'a>(&self, role: impl Into<RoleRef<'a>>) -> bool {
        self.roles.contains_key(role.into().role_id())
    }

    /// Returns the registered role for the given reference
    ///
    /// # Errors
    ///
    /// [`RbacError::RoleNotFound`] if the identifier is not registered.
    pub fn get_role<'a>(&self, role: impl Into<RoleRef<'a>>) -> Result<&Role> {
        let id = role.into().role_id();
        self.roles.get(id).ok_or_else(|| RbacError::RoleNotFound {
            role: id.to_string(),
        })
    }

    /// Mutable counterpart of [`Rbac::get_role`], for post-registration
    /// `allow`/`deny`/`add_child` on the stored role
    ///
    /// # Errors
    ///
    /// [`RbacError::RoleNotFound`] if the identifier is not registered.
    pub fn get_role_mut<'a>(&mut self, role: impl Into<RoleRef<'a>>) -> Result<&mut Role> {
        let id = role.into().role_id();
        self.roles
            .get_mut(id)
            .ok_or_else(|| RbacError::RoleNotFound {
                role: id.to_string(),
            })
    }

    /// Resolves whether the referenced role is permitted `permission`
    ///
    /// Resolution order:
    /// 1. An unregistered role is never granted anything: `false`, no error.
    /// 2. The role's own explicit decision, if any, is returned immediately;
    ///    descendants are never consulted past an explicit decision.
    /// 3. Otherwise the first explicit decision found in the depth-first,
    ///    self-first descendant traversal wins.
    /// 4. No explicit decision anywhere reachable: `false`.
    ///
    /// Safe to call with arbitrary, possibly-unregistered references at
    /// request time; resolution always terminates due to the cycle guard.
    pub fn is_granted<'a>(&self, role: impl Into<RoleRef<'a>>, permission: &str) -> bool {
        let id = role.into().role_id();

        let Some(role) = self.role(id) else {
            trace!(role = id, permission, "unknown role, not granted");
            return false;
        };

        let granted = match role.is_granted(permission) {
            Some(decision) => decision,
            None => role
                .descendants(self)
                .find_map(|descendant| descendant.is_granted(permission))
                .unwrap_or(false),
        };

        trace!(role = id, permission, granted, "resolved permission");
        granted
    }

    /// Returns the number of registered roles
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Checks whether no roles are registered
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the registered roles in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    /// Returns the registered role identifiers in registration order
    pub fn role_ids(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }
}

impl RoleContainer for Rbac {
    fn role(&self, id: &str) -> Option<&Role> {
        self.roles.get(id)
    }

    fn contains_role(&self, id: &str) -> bool {
        self.roles.contains_key(id)
    }
}

impl<'a> IntoIterator for &'a Rbac {
    type Item = &'a Role;
    type IntoIter = indexmap::map::Values<'a, String, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.roles.values()
    }
}
