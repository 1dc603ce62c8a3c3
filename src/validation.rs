//! Phone and email format gate.
//!
//! Empty values are always valid because both fields are optional. Non-empty
//! values are checked against [`FormatRules`]; the result is a pair of flags
//! the parent form uses to block submission.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::Draft;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn phone_re() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\+?[0-9()][0-9()\s.\-]*[0-9]$").expect("phone pattern is valid")
    })
}

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is valid")
    })
}

/// Syntactic format rules for optional contact fields.
pub trait FormatRules: Send + Sync {
    /// Returns true if `value` is an acceptable non-empty phone number.
    fn phone_ok(&self, value: &str) -> bool;

    /// Returns true if `value` is an acceptable non-empty email address.
    fn email_ok(&self, value: &str) -> bool;
}

/// Built-in rules: international-style phone numbers with 7 to 15 digits,
/// and `local@domain.tld` email addresses.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFormatRules;

impl FormatRules for DefaultFormatRules {
    fn phone_ok(&self, value: &str) -> bool {
        if !phone_re().is_match(value) {
            return false;
        }
        let digits = value.chars().filter(char::is_ascii_digit).count();
        (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
    }

    fn email_ok(&self, value: &str) -> bool {
        email_re().is_match(value)
    }
}

/// Checks a phone number with the built-in rules.
///
/// # Examples
///
/// ```
/// use contact_binding::validate_phone;
///
/// assert!(validate_phone(""));
/// assert!(validate_phone("+60 12-345 6789"));
/// assert!(!validate_phone("call me"));
/// ```
#[must_use]
pub fn validate_phone(value: &str) -> bool {
    check_phone(&DefaultFormatRules, value)
}

/// Checks an email address with the built-in rules.
///
/// # Examples
///
/// ```
/// use contact_binding::validate_email;
///
/// assert!(validate_email(""));
/// assert!(validate_email("john.tan@example.com"));
/// assert!(!validate_email("john.tan@"));
/// ```
#[must_use]
pub fn validate_email(value: &str) -> bool {
    check_email(&DefaultFormatRules, value)
}

pub(crate) fn check_phone(rules: &dyn FormatRules, value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || rules.phone_ok(value)
}

pub(crate) fn check_email(rules: &dyn FormatRules, value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || rules.email_ok(value)
}

/// Validity flags reported to the parent form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Phone is empty or well-formed.
    pub phone_valid: bool,
    /// Email is empty or well-formed.
    pub email_valid: bool,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            phone_valid: true,
            email_valid: true,
        }
    }
}

impl ValidationResult {
    /// Evaluates a draft's phone and email.
    #[must_use]
    pub fn of_draft(rules: &dyn FormatRules, draft: &Draft) -> Self {
        Self {
            phone_valid: check_phone(rules, &draft.phone),
            email_valid: check_email(rules, &draft.email),
        }
    }

    /// Returns true if both fields pass.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.phone_valid && self.email_valid
    }
}
