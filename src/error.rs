//! Error types for role registration and traversal

use thiserror::Error;

/// Result type alias for RBAC operations
pub type Result<T> = std::result::Result<T, RbacError>;

/// Errors raised by the role registry and the descendant traversal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RbacError {
    /// Role identifiers must be non-empty
    #[error("role identifier cannot be empty")]
    EmptyRoleId,

    /// A role with this identifier is already registered
    #[error("role '{role}' is already defined")]
    DuplicateRole { role: String },

    /// No role with this identifier is registered
    #[error("role '{role}' not found")]
    RoleNotFound { role: String },

    /// Descending from a traversal cursor that is past its end
    #[error("traversal cursor is not positioned at a valid role")]
    TraversalExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_role_display() {
        let err = RbacError::DuplicateRole {
            role: "admin".to_string(),
        };
        assert!(err.to_string().contains("already defined"));
        assert!(err.to_string().contains("admin"));
    }

    #[test]
    fn test_role_not_found_display() {
        let err = RbacError::RoleNotFound {
            role: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "role 'ghost' not found");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(RbacError::EmptyRoleId, RbacError::EmptyRoleId);
        assert_ne!(
            RbacError::TraversalExhausted,
            RbacError::RoleNotFound {
                role: "x".to_string()
            }
        );
    }
}
