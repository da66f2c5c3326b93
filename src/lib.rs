//! # Hierarchical RBAC (rbac)
//!
//! In-process role-based access control with support for:
//! - Role hierarchies forming an arbitrary directed graph
//! - Explicit tri-state permission decisions (granted / denied / unset)
//! - Cycle-safe depth-first permission resolution
//! - Lazily dereferenced, possibly-dangling child references
//!
//! Permission resolution consults a role's own explicit decision first, then
//! searches its descendants depth-first (self-first) for the first explicit
//! decision, defaulting to denied when none is found.
//!
//! ## Example
//!
//! ```rust
//! use rbac::Rbac;
//!
//! # fn example() -> Result<(), rbac::RbacError> {
//! let mut rbac = Rbac::new();
//!
//! rbac.add_role("third")?;
//! rbac.add_role_with_children("second", ["third"])?;
//! rbac.add_role_with_children("first", ["second"])?;
//!
//! rbac.get_role_mut("third")?.allow("foo");
//!
//! assert!(rbac.is_granted("first", "foo"));
//! assert!(rbac.is_granted("second", "foo"));
//! assert!(!rbac.is_granted("third", "bar"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod error;
pub mod registry;
pub mod role;
pub mod traversal;

pub use error::{RbacError, Result};
pub use registry::{Rbac, RoleContainer};
pub use role::{Role, RoleRef};
pub use traversal::{Descendants, RoleChildren};
