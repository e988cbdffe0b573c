use chrono::NaiveDate;

/// Display form for a date of birth.
///
/// Stored values are free-form; ISO dates render as DD.MM.YYYY, anything
/// already in that form or unparsable is shown as typed.
pub fn format_dob(raw: &str) -> String {
    let trimmed = raw.trim();

    if NaiveDate::parse_from_str(trimmed, "%d.%m.%Y").is_ok() {
        return trimmed.to_string();
    }

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => trimmed.to_string(),
    }
}
