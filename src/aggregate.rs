//! Merging of record sources into one suggestion list.
//!
//! Output order is: pinned record (or, without one, the bound record), the
//! remaining current-scope records in their original order, then global
//! search hits. Identity is the contact id; the first occurrence wins, so a
//! current-scope copy always beats a global copy of the same contact.

use std::collections::HashSet;

use crate::record::{ContactId, ContactRecord};

/// Merges pinned, current-scope and global records.
///
/// Records without an id are not bindable and are left out. When the bound
/// record is not the pinned one, it is moved to the front of the
/// current-scope block.
///
/// # Examples
///
/// ```
/// use contact_binding::{merge, ContactId, ContactRecord};
///
/// let pinned = ContactRecord::new(1, "Pinned");
/// let scope = vec![ContactRecord::new(2, "Scoped"), ContactRecord::new(1, "Pinned")];
/// let global = vec![ContactRecord::new(2, "Scoped"), ContactRecord::new(3, "Global")];
///
/// let merged = merge(Some(&pinned), &scope, &global, None);
/// let ids: Vec<_> = merged.iter().filter_map(|r| r.id).map(ContactId::get).collect();
/// assert_eq!(ids, vec![1, 2, 3]);
/// ```
#[must_use]
pub fn merge(
    pinned: Option<&ContactRecord>,
    scope_list: &[ContactRecord],
    global_list: &[ContactRecord],
    bound_id: Option<ContactId>,
) -> Vec<ContactRecord> {
    let mut seen: HashSet<ContactId> = HashSet::new();
    let mut merged = Vec::with_capacity(1 + scope_list.len() + global_list.len());

    let pinned_id = pinned.and_then(|p| p.id);
    if let (Some(record), Some(id)) = (pinned, pinned_id) {
        seen.insert(id);
        merged.push(record.clone());
    }

    let mut scoped: Vec<ContactRecord> = scope_list
        .iter()
        .filter(|r| r.id.is_some_and(|id| seen.insert(id)))
        .cloned()
        .collect();

    if let Some(bound) = bound_id.filter(|b| Some(*b) != pinned_id) {
        if let Some(pos) = scoped.iter().position(|r| r.id == Some(bound)) {
            let record = scoped.remove(pos);
            scoped.insert(0, record);
        }
    }
    merged.extend(scoped);

    merged.extend(
        global_list
            .iter()
            .filter(|r| r.id.is_some_and(|id| seen.insert(id)))
            .cloned(),
    );

    merged
}
