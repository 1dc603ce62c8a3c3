//! Contact records, drafts, and binding snapshots.
//!
//! A [`ContactRecord`] is the canonical identity of a bindable contact, no
//! matter which source produced it. The form edits a [`Draft`]; the last
//! successful binding is frozen in a [`Snapshot`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a persisted contact.
///
/// # Examples
///
/// ```
/// use contact_binding::ContactId;
///
/// let id = ContactId::new(5);
/// assert_eq!(id.get(), 5);
/// assert_eq!(id.to_string(), "5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ContactId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Editable fields of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    /// Display name; the disambiguating field.
    Name,
    /// Job title or role.
    Position,
    /// Phone number.
    Phone,
    /// Email address.
    Email,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Position => write!(f, "position"),
            Self::Phone => write!(f, "phone"),
            Self::Email => write!(f, "email"),
        }
    }
}

/// Identity and fields of a contact, from any source.
///
/// Records from the global search carry `origin_scope_name` (the parent record
/// they currently belong to). It is for display only and never takes part in
/// identity comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactRecord {
    /// `None` means the record has not been persisted.
    #[serde(default)]
    pub id: Option<ContactId>,

    /// Display name.
    pub name: String,

    /// Job title or role.
    #[serde(default)]
    pub position: String,

    /// Phone number, as entered at the source.
    #[serde(default)]
    pub phone: String,

    /// Email address.
    #[serde(default)]
    pub email: String,

    /// Parent record this contact belongs to, for global search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_scope_name: Option<String>,
}

impl ContactRecord {
    /// Creates a persisted record with only a name.
    ///
    /// # Examples
    ///
    /// ```
    /// use contact_binding::{ContactId, ContactRecord};
    ///
    /// let record = ContactRecord::new(5, "John Tan").with_phone("+60123456789");
    /// assert_eq!(record.id, Some(ContactId::new(5)));
    /// assert!(record.position.is_empty());
    /// ```
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(ContactId::new(id)),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a record that does not exist yet.
    #[must_use]
    pub fn unsaved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the position.
    #[must_use]
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Tags the record with the parent it currently belongs to.
    #[must_use]
    pub fn with_origin_scope(mut self, scope_name: impl Into<String>) -> Self {
        self.origin_scope_name = Some(scope_name.into());
        self
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Position => &self.position,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
        }
    }

    /// Label used in suggestion lists: `name (origin)` for records from another scope.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self.origin_scope_name.as_deref() {
            Some(origin) if !origin.is_empty() => format!("{} ({origin})", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Whether each optional field was auto-filled from a selected record.
///
/// `true` means the value came from the bound record; `false` means it was
/// typed by the user or is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Provenance {
    /// Position was auto-filled.
    #[serde(default)]
    pub position: bool,
    /// Phone was auto-filled.
    #[serde(default)]
    pub phone: bool,
    /// Email was auto-filled.
    #[serde(default)]
    pub email: bool,
}

impl Provenance {
    /// Provenance of a freshly bound record: set for every non-empty field.
    #[must_use]
    pub fn from_record(record: &ContactRecord) -> Self {
        Self {
            position: !record.position.is_empty(),
            phone: !record.phone.is_empty(),
            email: !record.email.is_empty(),
        }
    }

    /// Returns the flag for a field. The name has no provenance.
    #[must_use]
    pub const fn get(&self, field: ContactField) -> bool {
        match field {
            ContactField::Name => false,
            ContactField::Position => self.position,
            ContactField::Phone => self.phone,
            ContactField::Email => self.email,
        }
    }

    pub(crate) fn clear(&mut self, field: ContactField) {
        match field {
            ContactField::Name => {}
            ContactField::Position => self.position = false,
            ContactField::Phone => self.phone = false,
            ContactField::Email => self.email = false,
        }
    }
}

/// The live working copy the form binds to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Draft {
    /// Id of the bound record; `None` while unbound or new.
    pub id: Option<ContactId>,
    /// Name as currently shown in the input.
    pub name: String,
    /// Position as currently entered.
    pub position: String,
    /// Phone as currently entered.
    pub phone: String,
    /// Email as currently entered.
    pub email: String,
    /// Origin label carried over from a bound global record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_scope_name: Option<String>,
    /// Which optional fields still hold auto-filled values.
    pub provenance: Provenance,
}

impl Draft {
    /// An empty, unbound draft.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a draft from a record and an explicit provenance map.
    #[must_use]
    pub fn from_record(record: &ContactRecord, provenance: Provenance) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            position: record.position.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            origin_scope_name: record.origin_scope_name.clone(),
            provenance,
        }
    }

    /// Returns true when the draft is bound to a persisted record.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.id.is_some()
    }

    /// Returns true when any name text is present, whitespace included.
    ///
    /// This is the single emptiness test behind `Unbound` versus `NewEntry`.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Position => &self.position,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
        }
    }

    /// Writes a manually typed value and drops the field's provenance.
    pub(crate) fn set_manual(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::Name => self.name = value,
            ContactField::Position => self.position = value,
            ContactField::Phone => self.phone = value,
            ContactField::Email => self.email = value,
        }
        self.provenance.clear(field);
    }

    /// The value object the parent form submits.
    #[must_use]
    pub fn to_record(&self) -> ContactRecord {
        ContactRecord {
            id: self.id,
            name: self.name.clone(),
            position: self.position.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            origin_scope_name: self.origin_scope_name.clone(),
        }
    }
}

/// Frozen copy of the most recently bound record.
///
/// Only exists while the draft is bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    record: ContactRecord,
    bound_at: DateTime<Utc>,
}

impl Snapshot {
    pub(crate) fn capture(record: ContactRecord) -> Self {
        Self {
            record,
            bound_at: Utc::now(),
        }
    }

    /// The bound record.
    #[must_use]
    pub const fn record(&self) -> &ContactRecord {
        &self.record
    }

    /// Name at binding time; the divergence baseline.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Id of the bound record.
    #[must_use]
    pub const fn id(&self) -> Option<ContactId> {
        self.record.id
    }

    /// When the binding happened.
    #[must_use]
    pub const fn bound_at(&self) -> DateTime<Utc> {
        self.bound_at
    }
}

/// Externally supplied starting value, e.g. when editing an existing relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialValue {
    /// Record to seed the draft with. With an id it starts bound.
    pub record: ContactRecord,
    /// Provenance to restore alongside the record.
    #[serde(default)]
    pub provenance: Provenance,
}

impl InitialValue {
    /// Initial value whose provenance is derived from the record's non-empty fields.
    #[must_use]
    pub fn bound(record: ContactRecord) -> Self {
        let provenance = Provenance::from_record(&record);
        Self { record, provenance }
    }
}
