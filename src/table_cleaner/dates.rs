use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats tried in order when no explicit list is configured
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%Y%m%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub struct DateParser {
    formats: Vec<String>,
}

impl DateParser {
    pub fn new() -> Self {
        Self::with_formats(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect())
    }

    pub fn with_formats(formats: Vec<String>) -> Self {
        Self { formats }
    }

    /// Parse a calendar date or date-time. Offsets in RFC 3339 input are dropped.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        for format in &self.formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Some(dt);
            }
            if let Ok(d) = NaiveDate::parse_from_str(value, format) {
                return d.and_hms_opt(0, 0, 0);
            }
        }

        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.naive_local())
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new()
    }
}
