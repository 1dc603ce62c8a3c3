//! Binding a selected record and tracking how the draft drifts from it.

/// Writes a chosen record into the draft.
pub mod binder;
/// Binding status and its transition table.
pub mod divergence;
/// Name restore from the snapshot.
pub mod revert;

pub use binder::{bind, Binding};
pub use divergence::{BindingStatus, DivergenceDetector, Scope, StatusInput};
pub use revert::revert;
