//! Input checks shared by the services.

use coursebundler_core::error::{AppError, AppResult};
use coursebundler_core::types::Upload;

/// Returns the trimmed value, or `MissingField` when absent or blank.
pub(crate) fn required<'a>(field: &str, value: Option<&'a str>) -> AppResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::missing(field)),
    }
}

/// Returns the upload, or `MissingField` when absent or empty.
pub(crate) fn required_file<'a>(field: &str, upload: Option<&'a Upload>) -> AppResult<&'a Upload> {
    match upload {
        Some(u) if !u.is_empty() => Ok(u),
        _ => Err(AppError::missing(field)),
    }
}

/// Basic shape check: one `@`, non-empty local part, dotted domain.
pub(crate) fn validate_email(email: &str) -> AppResult<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::InvalidEmail);
    };

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');

    if local.is_empty() || !domain_ok || email.contains(char::is_whitespace) {
        return Err(AppError::InvalidEmail);
    }
    Ok(())
}
