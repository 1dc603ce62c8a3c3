//! The external contact directory used for global (cross-scope) search.

use std::sync::RwLock;

use crate::error::DirectoryError;
use crate::record::ContactRecord;

/// Cross-scope contact search.
///
/// Implementations own their transport and timeout policy. A failure is
/// never fatal to the resolver; it degrades to "no global matches".
pub trait ContactDirectory: Send + Sync {
    /// Returns every contact whose name contains `query` verbatim.
    fn search_global(&self, query: &str) -> Result<Vec<ContactRecord>, DirectoryError>;
}

/// Directory backed by an in-process list of contacts.
///
/// Matching is a case-insensitive substring test on the name. Results keep
/// insertion order and are capped at `limit`.
#[derive(Debug)]
pub struct InMemoryDirectory {
    contacts: RwLock<Vec<ContactRecord>>,
    limit: usize,
}

impl InMemoryDirectory {
    /// Default number of results returned per query.
    pub const DEFAULT_LIMIT: usize = 20;

    /// Creates a directory over the given contacts.
    #[must_use]
    pub fn new(contacts: Vec<ContactRecord>) -> Self {
        Self {
            contacts: RwLock::new(contacts),
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Overrides the result cap.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Adds a contact.
    pub fn insert(&self, contact: ContactRecord) -> Result<(), DirectoryError> {
        let mut guard = self.contacts.write().map_err(|_| DirectoryError::Unavailable {
            message: "directory lock poisoned".to_string(),
        })?;
        guard.push(contact);
        Ok(())
    }
}

impl ContactDirectory for InMemoryDirectory {
    fn search_global(&self, query: &str) -> Result<Vec<ContactRecord>, DirectoryError> {
        let needle = query.to_lowercase();
        let guard = self.contacts.read().map_err(|_| DirectoryError::Unavailable {
            message: "directory lock poisoned".to_string(),
        })?;
        Ok(guard
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .take(self.limit)
            .cloned()
            .collect())
    }
}
