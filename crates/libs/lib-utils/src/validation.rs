//! # Validation Utilities
//!
//! Input validation helpers for configuration values.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a value looks like an `http://` or `https://` URL.
pub fn validate_http_url(value: &str, field_name: &str) -> Result<(), String> {
    validate_not_empty(value, field_name)?;
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| format!("{} must start with http:// or https://", field_name))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("{} is missing a host", field_name));
    }
    Ok(())
}

/// Validate that `value` lies within `min..=max`.
pub fn validate_range(value: u64, min: u64, max: u64, field_name: &str) -> Result<(), String> {
    if value < min || value > max {
        Err(format!("{} must be between {} and {}", field_name, min, max))
    } else {
        Ok(())
    }
}
