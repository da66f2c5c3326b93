//! Cycle-safe depth-first traversal over a role's descendant graph
//!
//! [`RoleChildren`] walks one level of children; [`Descendants`] flattens the
//! recursive walk into a pre-order (self-first) iterator. Child identifiers
//! are dereferenced against the container at traversal time, so dangling
//! references are skipped silently and a cycle is pruned where a role would
//! reappear on its own ancestor chain.

use std::collections::HashSet;

use crate::error::{RbacError, Result};
use crate::registry::RoleContainer;
use crate::role::Role;

/// Cursor over one level of a role's children
///
/// Iterates the parent's listed child identifiers in insertion order,
/// skipping identifiers that do not resolve in the container and
/// identifiers already on the path from the traversal root to the parent.
/// The cursor positions itself on the first accepted child at construction,
/// so the skip rules apply at every position including the first.
#[derive(Debug, Clone)]
pub struct RoleChildren<'a, C: RoleContainer> {
    container: &'a C,
    children: Vec<&'a str>,
    pos: usize,
    /// Identifiers from the traversal root down to this level's parent,
    /// inclusive; carried by value so sibling subtrees do not interfere
    path: HashSet<&'a str>,
}

impl<'a, C: RoleContainer> RoleChildren<'a, C> {
    /// Starts a traversal level over `role`'s children
    ///
    /// The cycle-guard path is seeded with `role`'s own identifier.
    pub fn new(role: &'a Role, container: &'a C) -> Self {
        let mut path = HashSet::new();
        path.insert(role.role_id());
        Self::with_path(role, container, path)
    }

    fn with_path(role: &'a Role, container: &'a C, path: HashSet<&'a str>) -> Self {
        let mut cursor = Self {
            container,
            children: role.children().collect(),
            pos: 0,
            path,
        };
        cursor.skip_rejected();
        cursor
    }

    /// The role at the cursor position, or `None` past the end
    pub fn current(&self) -> Option<&'a Role> {
        self.children
            .get(self.pos)
            .and_then(|id| self.container.role(id))
    }

    /// Moves the cursor to the next accepted child
    pub fn advance(&mut self) {
        if self.pos < self.children.len() {
            self.pos += 1;
            self.skip_rejected();
        }
    }

    /// Checks whether the cursor is valid and the current role has at least
    /// one child resolvable in the container
    pub fn has_children(&self) -> bool {
        self.current()
            .is_some_and(|role| role.has_children(self.container))
    }

    /// Returns the child-level cursor for the current role
    ///
    /// The child level's path is this level's path plus the current role's
    /// identifier.
    ///
    /// # Errors
    ///
    /// [`RbacError::TraversalExhausted`] if the cursor is past its end.
    pub fn descend(&self) -> Result<RoleChildren<'a, C>> {
        let role = self.current().ok_or(RbacError::TraversalExhausted)?;
        Ok(self.child_cursor(role))
    }

    fn child_cursor(&self, role: &'a Role) -> RoleChildren<'a, C> {
        let mut path = self.path.clone();
        path.insert(role.role_id());
        Self::with_path(role, self.container, path)
    }

    fn accepted(&self, id: &str) -> bool {
        self.container.contains_role(id) && !self.path.contains(id)
    }

    fn skip_rejected(&mut self) {
        while let Some(id) = self.children.get(self.pos) {
            if self.accepted(id) {
                break;
            }
            self.pos += 1;
        }
    }
}

/// Pre-order (self-first) iterator over a role's accepted descendants
///
/// Yields each accepted child, then its accepted descendants, then the next
/// sibling. Implemented as an explicit stack of [`RoleChildren`] levels, so
/// the call stack stays bounded on deep graphs. One traversal per
/// resolution; not restartable.
#[derive(Debug)]
pub struct Descendants<'a, C: RoleContainer> {
    stack: Vec<RoleChildren<'a, C>>,
}

impl<'a, C: RoleContainer> Descendants<'a, C> {
    /// Starts a descendant traversal rooted at `role`
    pub fn new(role: &'a Role, container: &'a C) -> Self {
        Self {
            stack: vec![RoleChildren::new(role, container)],
        }
    }
}

impl<'a, C: RoleContainer> Iterator for Descendants<'a, C> {
    type Item = &'a Role;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            if let Some(role) = level.current() {
                let child_level = level.child_cursor(role);
                level.advance();
                self.stack.push(child_level);
                return Some(role);
            }
            self.stack.pop();
        }
    }
}
