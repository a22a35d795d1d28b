//! Form rules shared by payloads, and conversion of `validator` failures.

use chrono::{Datelike, Local, NaiveDate};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use memberhub_core::{AppError, AppResult};

/// Minimum age of a member at registration.
pub const MIN_MEMBER_AGE: u32 = 18;

/// Validate a payload, mapping failures to a single validation error.
///
/// The message lists every failing field as `field: message`, sorted by
/// field path so output is stable.
pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(|errors| {
        let mut lines = Vec::new();
        collect_messages("", &errors, &mut lines);
        lines.sort();
        AppError::validation(lines.join("; "))
    })
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

/// Age in whole years on `today`.
pub fn age_on(date_of_birth: &NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Reject dates of birth younger than [`MIN_MEMBER_AGE`].
pub fn validate_min_age(date_of_birth: &NaiveDate) -> Result<(), ValidationError> {
    if age_on(date_of_birth, Local::now().date_naive()) < MIN_MEMBER_AGE {
        let mut err = ValidationError::new("min_age");
        err.message = Some(format!("Member must be at least {MIN_MEMBER_AGE} years old").into());
        return Err(err);
    }
    Ok(())
}

/// Phone numbers: optional leading `+`, then 10 to 15 digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let valid = (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    if !valid {
        let mut err = ValidationError::new("phone");
        err.message = Some("Phone must be 10 to 15 digits".into());
        return Err(err);
    }
    Ok(())
}

/// Codes: uppercase letters, digits and dashes.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    let valid = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        let mut err = ValidationError::new("code");
        err.message = Some("Code may only contain A-Z, 0-9 and '-'".into());
        return Err(err);
    }
    Ok(())
}
