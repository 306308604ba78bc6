//! Field rules shared by product and review payloads.
//!
//! Messages follow the wording API clients already match on.

use shopfront_core::ValidationErrors;

pub(crate) const MAX_STRING_LEN: usize = 255;

/// Non-blank string check.
pub(crate) fn required(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("The {field} field is required."));
        return false;
    }
    true
}

/// Counts the trimmed value, which is what gets stored.
pub(crate) fn max_chars(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.trim().chars().count() > max {
        errors.add(
            field,
            format!("The {field} may not be greater than {max} characters."),
        );
    }
}

pub(crate) fn max_value(errors: &mut ValidationErrors, field: &str, value: u64, max: u64) {
    if value > max {
        errors.add(field, format!("The {field} may not be greater than {max}."));
    }
}

/// `required` + `max_chars(255)`, the usual rule for short text columns.
pub(crate) fn short_text(errors: &mut ValidationErrors, field: &str, value: &str) {
    if required(errors, field, value) {
        max_chars(errors, field, value, MAX_STRING_LEN);
    }
}
