//! Writing a chosen record into the draft.

use crate::error::ContractError;
use crate::record::{ContactRecord, Draft, Provenance, Snapshot};
use crate::validation::{FormatRules, ValidationResult};

/// Result of binding a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Draft holding every field of the record.
    pub draft: Draft,
    /// Frozen copy used as the divergence and revert baseline.
    pub snapshot: Snapshot,
    /// Auto-fill flags for the non-empty optional fields.
    pub provenance: Provenance,
    /// Validity of the record's own phone/email. A malformed source record
    /// yields an invalid draft; it is reported, not repaired.
    pub validation: ValidationResult,
}

/// Binds `record`, copying every field into both draft and snapshot.
///
/// Provenance is set for every non-empty optional field.
///
/// # Errors
///
/// Returns [`ContractError::SelectWithoutId`] if the record was never
/// persisted; only persisted records can be bound.
pub fn bind(record: &ContactRecord, rules: &dyn FormatRules) -> Result<Binding, ContractError> {
    if record.id.is_none() {
        return Err(ContractError::SelectWithoutId {
            name: record.name.clone(),
        });
    }

    let provenance = Provenance::from_record(record);
    let draft = Draft::from_record(record, provenance);
    let validation = ValidationResult::of_draft(rules, &draft);

    Ok(Binding {
        draft,
        snapshot: Snapshot::capture(record.clone()),
        provenance,
        validation,
    })
}
