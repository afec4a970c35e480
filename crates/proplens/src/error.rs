//! Error types for property resolution and proxy access

use crate::convert::ConversionError;

/// Result type for resolution and access operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Which resolver chain or accessor map an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// Read side
    Getter,
    /// Write side
    Setter,
}

impl std::fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessorKind::Getter => write!(f, "getter"),
            AccessorKind::Setter => write!(f, "setter"),
        }
    }
}

/// Property access error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
    /// The resolver chain is empty
    #[error("No {chain} resolvers registered. Please boot before use!")]
    RegistryNotBooted {
        /// Chain that was queried
        chain: AccessorKind,
    },

    /// No registered resolver claims the value
    #[error("No {chain} resolver supports type \"{type_name}\"")]
    UnsupportedType {
        /// Chain that was queried
        chain: AccessorKind,
        /// Name of the rejected type
        type_name: String,
    },

    /// One or more explicitly requested properties could not be resolved
    #[error("No public {kind} or property found for: {} in {type_name}", .missing.join(", "))]
    PropertyNotFound {
        /// Side that was resolved
        kind: AccessorKind,
        /// Type that was inspected
        type_name: String,
        /// Every requested name that was not found, in request order
        missing: Vec<String>,
    },

    /// A proxy was read or written through a name absent from its map
    #[error("No {kind} found for \"{name}\" in {type_name}")]
    AccessorNotFound {
        /// Map that was consulted
        kind: AccessorKind,
        /// Requested name
        name: String,
        /// Type behind the proxy
        type_name: String,
    },

    /// Write attempted through a read-only proxy
    #[error("Cannot write via a read-only proxy.")]
    ReadOnlyViolation,

    /// Removal of a property through a proxy
    #[error("Cannot unset values on AccessProxy; use object methods directly.")]
    UnsupportedOperation,

    /// Setter map requested from a read-only proxy
    #[error("This proxy was created in read-only mode.")]
    ReadOnlyMode,

    /// An accessor was invoked on a value of another type
    #[error("Accessor bound to {expected} invoked on a different type")]
    TargetMismatch {
        /// Type the accessor was built for
        expected: &'static str,
    },

    /// A value could not be converted to or from the property type
    #[error("Cannot convert value for \"{property}\": {source}")]
    Conversion {
        /// Property being written
        property: String,
        /// Underlying conversion failure
        #[source]
        source: ConversionError,
    },
}
