use chrono::{DateTime, Utc};

/// Minute-precision timestamp for result lists.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}
