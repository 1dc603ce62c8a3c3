//! Binding status and the divergence state machine.
//!
//! Only the name takes part in divergence: editing position, phone or email
//! of a bound draft leaves the status alone. A bound draft whose name no
//! longer equals the snapshot's is [`BindingStatus::DivergentEdit`] until the
//! name is typed back or reverted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{ContactId, ContactRecord, Draft, Snapshot};

/// Relationship between the draft and a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingStatus {
    /// No id, no text.
    #[default]
    Unbound,
    /// No id, non-empty free text.
    NewEntry,
    /// Bound to a record in the current-scope candidate list.
    BoundCurrentScope,
    /// Bound to a record found through global search.
    BoundOtherScope,
    /// Bound, but the name no longer matches the snapshot.
    DivergentEdit,
}

impl BindingStatus {
    /// True for every status that implies an id.
    #[must_use]
    pub const fn is_bound(self) -> bool {
        matches!(self, Self::BoundCurrentScope | Self::BoundOtherScope | Self::DivergentEdit)
    }

    /// True only for [`BindingStatus::DivergentEdit`].
    #[must_use]
    pub const fn is_divergent(self) -> bool {
        matches!(self, Self::DivergentEdit)
    }

    /// Bound status for a scope.
    #[must_use]
    pub const fn bound_in(scope: Scope) -> Self {
        match scope {
            Scope::Current => Self::BoundCurrentScope,
            Scope::Other => Self::BoundOtherScope,
        }
    }
}

impl fmt::Display for BindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => write!(f, "unbound"),
            Self::NewEntry => write!(f, "new_entry"),
            Self::BoundCurrentScope => write!(f, "bound_current_scope"),
            Self::BoundOtherScope => write!(f, "bound_other_scope"),
            Self::DivergentEdit => write!(f, "divergent_edit"),
        }
    }
}

/// Where a bound record lives relative to the form's parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Belongs to the parent being edited.
    Current,
    /// Found through global search.
    Other,
}

/// Inputs that can move the status.
#[derive(Debug, Clone, Copy)]
pub enum StatusInput<'a> {
    /// Explicit clear. Always wins.
    Clear,
    /// A record with this id was bound.
    Select {
        id: ContactId,
    },
    /// The name changed; the draft already holds the new value.
    NameEdit {
        draft: &'a Draft,
        snapshot: Option<&'a Snapshot>,
    },
    /// Position, phone or email changed.
    OtherFieldEdit,
    /// The name was restored from the snapshot.
    Revert {
        snapshot: Option<&'a Snapshot>,
    },
    /// The input gained focus.
    Focus,
    /// The input lost focus.
    Blur {
        draft: &'a Draft,
    },
    /// The typed text was accepted as a brand-new contact.
    AddAsNew {
        name: &'a str,
    },
    /// The current-scope candidate list changed.
    Rescope {
        id: Option<ContactId>,
    },
}

/// Total transition function over [`BindingStatus`].
#[derive(Debug, Clone, Copy)]
pub struct DivergenceDetector<'a> {
    candidates: &'a [ContactRecord],
}

impl<'a> DivergenceDetector<'a> {
    /// Creates a detector that derives scope from `candidates`.
    #[must_use]
    pub const fn new(candidates: &'a [ContactRecord]) -> Self {
        Self { candidates }
    }

    /// Scope of a bound id.
    #[must_use]
    pub fn scope_of(&self, id: ContactId) -> Scope {
        if self.candidates.iter().any(|c| c.id == Some(id)) {
            Scope::Current
        } else {
            Scope::Other
        }
    }

    /// Classifies a draft against its snapshot from scratch.
    #[must_use]
    pub fn classify(&self, draft: &Draft, snapshot: Option<&Snapshot>) -> BindingStatus {
        match (draft.id, snapshot) {
            (None, _) if !draft.has_name() => BindingStatus::Unbound,
            (None, _) => BindingStatus::NewEntry,
            (Some(_), Some(snapshot)) if draft.name != snapshot.name() => BindingStatus::DivergentEdit,
            (Some(id), _) => BindingStatus::bound_in(self.scope_of(id)),
        }
    }

    /// Next status after `input`. Every (status, input) pair is defined.
    #[must_use]
    pub fn transition(&self, current: BindingStatus, input: StatusInput<'_>) -> BindingStatus {
        match input {
            StatusInput::Clear => BindingStatus::Unbound,
            StatusInput::Select { id } => BindingStatus::bound_in(self.scope_of(id)),
            StatusInput::NameEdit { draft, snapshot } => self.classify(draft, snapshot),
            StatusInput::OtherFieldEdit | StatusInput::Focus => current,
            StatusInput::Revert { snapshot } => match snapshot.and_then(Snapshot::id) {
                Some(id) if current.is_bound() => BindingStatus::bound_in(self.scope_of(id)),
                _ => current,
            },
            StatusInput::Blur { draft } => {
                // Unbound only ever means no id and no text; a prefilled
                // name keeps its status even if nobody typed.
                if draft.id.is_none() && !draft.has_name() {
                    BindingStatus::Unbound
                } else {
                    current
                }
            }
            StatusInput::AddAsNew { name } => {
                if name.is_empty() {
                    BindingStatus::Unbound
                } else {
                    BindingStatus::NewEntry
                }
            }
            StatusInput::Rescope { id } => match (current, id) {
                (BindingStatus::BoundCurrentScope | BindingStatus::BoundOtherScope, Some(id)) => {
                    BindingStatus::bound_in(self.scope_of(id))
                }
                _ => current,
            },
        }
    }
}
