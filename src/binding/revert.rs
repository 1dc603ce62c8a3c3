//! Restoring a divergent name from the snapshot.

use crate::record::{Draft, Snapshot};

/// Restores only the name from the snapshot.
///
/// Every other field, including hand-edited ones, is kept as is. The
/// caller re-runs the divergence detector afterwards.
#[must_use]
pub fn revert(draft: &Draft, snapshot: &Snapshot) -> Draft {
    Draft {
        name: snapshot.name().to_string(),
        ..draft.clone()
    }
}
