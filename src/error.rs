//! Error types for boundary crossings.
//!
//! Every fallible operation in this crate returns [`BridgeError`] as a value.
//! Nothing is allowed to unwind across the runtime boundary in either
//! direction: the foreign runtime's exception model is incompatible with
//! native unwinding, so foreign faults are caught at the boundary and
//! re-packaged into [`BridgeError::InvocationFault`] carrying the foreign
//! exception's type name and message.

use thiserror::Error;

use crate::variant::ValueKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Structured failure for any boundary operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    /// A type or member was looked up by name and is absent.
    ///
    /// Note that [`Bridge::is_type_valid`](crate::Bridge::is_type_valid)
    /// never produces this: for a plain validity probe, absence is a valid
    /// boolean outcome, not a failure.
    #[error("not found: {0}")]
    NotFound(String),

    /// A member's declared type cannot be represented in the closed
    /// [`ValueKind`] set, so no descriptor can be built for its type.
    #[error("unsupported type '{foreign_type}' for member '{owner}.{member}'")]
    UnsupportedType {
        /// The foreign type name that could not be classified.
        foreign_type: String,
        /// The type declaring the offending member.
        owner: String,
        /// The offending member.
        member: String,
    },

    /// Descriptor construction failed for a reason other than an
    /// unrepresentable member type.
    #[error("failed to build descriptor for '{type_name}': {reason}")]
    Build {
        /// The type being described.
        type_name: String,
        /// What went wrong.
        reason: String,
    },

    /// Object activation failed: the type is abstract, has no zero-argument
    /// constructor, or its constructor raised in the foreign runtime.
    #[error("failed to instantiate '{type_name}': {reason}")]
    Instantiation {
        /// The type being activated.
        type_name: String,
        /// What went wrong.
        reason: String,
    },

    /// A read was attempted on a non-readable property, or a write on a
    /// non-writable one.
    #[error("property '{property}' is not {required}")]
    AccessViolation {
        /// The property involved.
        property: String,
        /// The missing capability: "readable" or "writable".
        required: &'static str,
    },

    /// A variant's active tag is incompatible with a declared value type.
    ///
    /// Numeric widening from [`ValueKind::Int`] to [`ValueKind::Float`] is
    /// the only implicit coercion permitted; everything else lands here.
    #[error("type mismatch at {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The declared kind.
        expected: ValueKind,
        /// The kind actually supplied.
        actual: ValueKind,
        /// Which slot mismatched, e.g. `Counter.Value` or `Add argument 1`.
        context: String,
    },

    /// An argument list's length does not match the method's parameter count.
    #[error("method '{method}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// The method being invoked.
        method: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// The target of a crossing is unusable: its lifetime handle has been
    /// released, or its runtime type does not match the member's owner.
    #[error("invalid target: {0}")]
    TargetInvalid(String),

    /// The foreign method itself raised. The foreign exception is surfaced
    /// as data, never re-thrown natively.
    #[error("foreign fault [{type_name}]: {message}")]
    InvocationFault {
        /// The foreign exception's type name.
        type_name: String,
        /// The foreign exception's message, preserved verbatim.
        message: String,
    },

    /// The foreign runtime itself is unavailable or misbehaving. This is the
    /// only error class that does not describe a per-call outcome.
    #[error("foreign runtime unavailable: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_access_violation() {
        let err = BridgeError::AccessViolation {
            property: "Name".to_string(),
            required: "writable",
        };
        assert_eq!(format!("{err}"), "property 'Name' is not writable");
    }

    #[test]
    fn display_arity_mismatch() {
        let err = BridgeError::ArityMismatch {
            method: "Add".to_string(),
            expected: 2,
            got: 3,
        };
        assert_eq!(format!("{err}"), "method 'Add' expects 2 argument(s), got 3");
    }

    #[test]
    fn display_invocation_fault() {
        let err = BridgeError::InvocationFault {
            type_name: "System.InvalidOperationException".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "foreign fault [System.InvalidOperationException]: boom"
        );
    }

    #[test]
    fn display_type_mismatch() {
        let err = BridgeError::TypeMismatch {
            expected: ValueKind::Int,
            actual: ValueKind::Str,
            context: "Counter.Value".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "type mismatch at Counter.Value: expected int, got string"
        );
    }
}
