use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ApiError, ApiResult};
use crate::model::attendance::AttendanceStatus;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

/// Fails with every field that is absent or blank after trimming, in the order given.
pub fn require_fields(fields: &[(&str, Option<&str>)]) -> ApiResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Parses a `YYYY-MM-DD` calendar date; the error names `param`.
pub fn parse_date(value: &str, param: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Invalid {param} format. Use YYYY-MM-DD")))
}

pub fn parse_status(value: &str) -> ApiResult<AttendanceStatus> {
    value
        .parse()
        .map_err(|_| ApiError::validation("Status must be 'Present' or 'Absent'"))
}

/// Query-string values that are present but empty count as absent.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
