//! Hourly call data models.
//!
//! A dataset is an ordered `Vec<HourlyDataPoint>`; order drives the chart's
//! x-axis and is preserved through persistence.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyDataPoint {
    /// Hour label, e.g. "08:00".
    pub hour: String,
    pub calls: u32,
    /// Average call duration in seconds.
    pub duration: u32,
}

impl HourlyDataPoint {
    pub fn new(hour: impl Into<String>, calls: u32, duration: u32) -> Self {
        Self {
            hour: hour.into(),
            calls,
            duration,
        }
    }

    /// Returns a copy with one field replaced.
    pub fn with_field(&self, field: HourlyField, value: u32) -> Self {
        let mut updated = self.clone();
        match field {
            HourlyField::Calls => updated.calls = value,
            HourlyField::Duration => updated.duration = value,
        }
        updated
    }
}

/// Editable columns of the hourly form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HourlyField {
    Calls,
    Duration,
}

/// One bar of the call-duration distribution chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DurationBucket {
    pub range: String,
    pub count: u32,
}

/// Dataset shown before any saved data is loaded.
pub fn default_hourly_data() -> Vec<HourlyDataPoint> {
    vec![
        HourlyDataPoint::new("00:00", 45, 320),
        HourlyDataPoint::new("04:00", 32, 280),
        HourlyDataPoint::new("08:00", 95, 450),
        HourlyDataPoint::new("12:00", 142, 680),
        HourlyDataPoint::new("16:00", 128, 620),
        HourlyDataPoint::new("20:00", 76, 380),
    ]
}

pub fn duration_distribution() -> Vec<DurationBucket> {
    [
        ("0-2 min", 145),
        ("2-5 min", 234),
        ("5-10 min", 187),
        ("10-15 min", 98),
        ("15+ min", 54),
    ]
    .into_iter()
    .map(|(range, count)| DurationBucket {
        range: range.to_string(),
        count,
    })
    .collect()
}

/// Parses form input the way a lenient integer prefix parse would: leading
/// whitespace and sign are accepted and trailing garbage is ignored
/// (`"12abc"` is 12). Negative or unparseable input becomes 0 and values past
/// `u32::MAX` saturate.
pub fn parse_field_value(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if negative || digits.is_empty() {
        return 0;
    }

    digits
        .parse::<u64>()
        .map(|value| u32::try_from(value).unwrap_or(u32::MAX))
        .unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_integers() {
        assert_eq!(parse_field_value("42"), 42);
        assert_eq!(parse_field_value("  7"), 7);
        assert_eq!(parse_field_value("+15"), 15);
    }

    #[test]
    fn parse_keeps_leading_digits() {
        assert_eq!(parse_field_value("12abc"), 12);
        assert_eq!(parse_field_value("7.9"), 7);
    }

    #[test]
    fn parse_falls_back_to_zero() {
        assert_eq!(parse_field_value("abc"), 0);
        assert_eq!(parse_field_value(""), 0);
        assert_eq!(parse_field_value("-5"), 0);
        assert_eq!(parse_field_value("-"), 0);
    }

    #[test]
    fn parse_saturates_large_values() {
        assert_eq!(parse_field_value("4294967296"), u32::MAX);
        assert_eq!(parse_field_value("99999999999999999999999"), u32::MAX);
    }

    #[test]
    fn with_field_touches_only_target() {
        let point = HourlyDataPoint::new("08:00", 95, 450);
        let updated = point.with_field(HourlyField::Duration, 10);

        assert_eq!(updated, HourlyDataPoint::new("08:00", 95, 10));
        assert_eq!(point.duration, 450);
    }

    #[test]
    fn default_dataset_is_ordered_by_hour() {
        let hours: Vec<_> = default_hourly_data()
            .into_iter()
            .map(|point| point.hour)
            .collect();
        let mut sorted = hours.clone();
        sorted.sort();
        assert_eq!(hours, sorted);
    }
}
