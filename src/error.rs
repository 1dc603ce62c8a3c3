//! Error types for contact binding.
//!
//! Errors are strongly typed using thiserror. Only caller misuse and bad
//! configuration ever reach the caller: search failures are absorbed by the
//! search controller, and phone/email format problems are reported as flags
//! in [`crate::ValidationResult`], never as errors.

use thiserror::Error;

/// Misuse of the binding contract by the calling layer.
///
/// These indicate a programming error in the parent form. The event that
/// triggered one is rejected and the resolver state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("Cannot bind contact '{name}': record has no id")]
    SelectWithoutId {
        name: String,
    },
}

/// Failures reported by the external contact directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("Contact directory unavailable: {message}")]
    Unavailable {
        message: String,
    },

    #[error("Contact directory rejected query '{query}': {reason}")]
    Rejected {
        query: String,
        reason: String,
    },

    #[error("Search queue is full (capacity: {capacity})")]
    QueueFull {
        capacity: usize,
    },

    #[error("Search router disconnected")]
    Disconnected,
}

/// Invalid resolver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Field '{field}' must be greater than zero")]
    MustBePositive {
        field: String,
    },

    #[error("Failed to parse resolver config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level error type for contact binding.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ResolverError {
    /// Returns true if this error reports misuse of the binding contract.
    #[must_use]
    pub const fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl DirectoryError {
    /// Returns true if the failure came from the local dispatcher rather than the directory itself.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::QueueFull { .. } | Self::Disconnected)
    }
}

/// Result type alias for contact binding operations.
pub type ResolverResult<T> = Result<T, ResolverError>;
