//! Error types for the hardware abstraction layer.
//!
//! `HalError` is the single error type returned by every instrument operation,
//! driver factory and registry call in the library crates. Binaries wrap it in
//! `anyhow` at the application edge.
//!
//! ## Error Categories
//!
//! - **Gating**: `MissingDependencies`, `EmptyRequirement` are raised when a
//!   capability-gated driver is constructed without its optional dependencies.
//! - **Lifecycle**: `AlreadyOpen` is the session policy violation.
//! - **Configuration**: `Configuration`, `UnknownDriver`, `NoFakeDesignated`,
//!   `FamilyMismatch` and the wrapped parse errors.
//! - **Driver**: `Driver` and `Io` carry failures reported by a concrete
//!   implementation. The HAL defines no taxonomy for them.

use thiserror::Error;

use crate::family::InstrumentFamily;

/// Convenience alias for results using the HAL error type.
pub type HalResult<T> = std::result::Result<T, HalError>;

/// Primary error type for instrument drivers and the registry.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HalError {
    /// A capability-gated type was constructed while some of its optional
    /// dependencies are unavailable.
    ///
    /// **Error Type**: Permanent for the lifetime of the process. The gate
    /// outcome is computed once and never re-evaluated.
    ///
    /// **Recovery Strategy**: Install the missing dependencies and restart,
    /// or select another driver (for example the family's fake).
    #[error(
        "{class} requires the optional dependencies [{}] and at least one is not available (missing: [{}])",
        .required.join(", "),
        .missing.join(", ")
    )]
    MissingDependencies {
        /// Name of the gated type.
        class: String,
        /// Every dependency the type declares, in declaration order.
        required: Vec<String>,
        /// The dependencies that failed to resolve, in declaration order.
        missing: Vec<String>,
    },

    /// A capability gate was declared with an empty dependency list.
    #[error("{class} declares a capability gate without any dependency")]
    EmptyRequirement {
        /// Name of the gated type.
        class: String,
    },

    /// `open` was called on an instrument whose session is already open.
    #[error("{0} is already open (close it before opening again)")]
    AlreadyOpen(String),

    /// Configuration or parameter validation failed.
    ///
    /// Occurs when values parse correctly but are semantically invalid
    /// (negative acquisition time, duplicate instrument id, ...).
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// No factory is registered for the requested driver type.
    #[error("No driver registered with type '{0}'")]
    UnknownDriver(String),

    /// `driver = "fake"` was requested for a family with no designated fake.
    #[error("No fake driver designated for the {0} family")]
    NoFakeDesignated(InstrumentFamily),

    /// The configured family does not match what the driver builds.
    #[error("Driver '{driver}' builds {actual} instruments, but the configuration asks for {expected}")]
    FamilyMismatch {
        /// Driver type that was selected.
        driver: String,
        /// Family requested by the configuration.
        expected: InstrumentFamily,
        /// Family the driver actually provides.
        actual: InstrumentFamily,
    },

    /// Failure reported by a concrete driver.
    #[error("Driver '{driver}' error: {message}")]
    Driver {
        /// Driver type or instrument description.
        driver: String,
        /// Driver-specific message.
        message: String,
    },

    /// Standard I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON payload could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML value could not be deserialized into the expected type.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl HalError {
    /// Build a driver error from a driver name and message.
    pub fn driver(driver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            driver: driver.into(),
            message: message.into(),
        }
    }

    /// Returns true when the error comes from a disabled capability gate.
    pub fn is_gated(&self) -> bool {
        matches!(
            self,
            Self::MissingDependencies { .. } | Self::EmptyRequirement { .. }
        )
    }
}
