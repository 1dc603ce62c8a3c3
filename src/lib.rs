//! # contact_binding - Contact resolution for relationship edit forms
//!
//! Attaching a contact to a parent record (for example, a person to an
//! organization) means reconciling several sources at once: the record the
//! form was originally bound to, the contacts already scoped to the parent,
//! and an unbounded global search. On every keystroke this crate decides
//! whether the user is searching, editing a bound record, or defining a new
//! one, without ever silently discarding already-bound data.
//!
//! ## Core Concepts
//!
//! - **ContactRecord**: identity and fields of a bindable contact, from any source
//! - **Draft**: the live editable copy, with per-field provenance
//! - **Snapshot**: the record as it was at the last binding
//! - **BindingStatus**: Unbound, NewEntry, BoundCurrentScope, BoundOtherScope, DivergentEdit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Instant;
//! use contact_binding::{ContactRecord, InMemoryDirectory, Orchestrator, ResolverConfig, ResolverEvent};
//!
//! let directory = Arc::new(InMemoryDirectory::new(vec![]));
//! let mut resolver = Orchestrator::new(ResolverConfig::default(), directory)?;
//! resolver.set_scope_candidates(vec![ContactRecord::new(5, "John Tan")]);
//!
//! let view = resolver.dispatch(ResolverEvent::TextInput("Jo".into()), Instant::now())?;
//! let view = resolver.dispatch(ResolverEvent::SelectRecord(view.suggestions[0].clone()), Instant::now())?;
//! assert!(view.status.is_bound());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod binding;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod record;
pub mod search;
pub mod validation;

// Re-export primary types at crate root for convenience
pub use aggregate::merge;
pub use binding::{bind, revert, Binding, BindingStatus, DivergenceDetector, Scope, StatusInput};
pub use config::ResolverConfig;
pub use error::{ConfigError, ContractError, DirectoryError, ResolverError, ResolverResult};
pub use orchestrator::{Orchestrator, ResolverEvent, ResolverListener, ResolverState, ResolverView};
pub use record::{ContactField, ContactId, ContactRecord, Draft, InitialValue, Provenance, Snapshot};
pub use search::{
    ContactDirectory, InMemoryDirectory, SearchCompletion, SearchController, SearchDispatcher,
    SearchResultSet, SearchTicket,
};
pub use validation::{validate_email, validate_phone, DefaultFormatRules, FormatRules, ValidationResult};
