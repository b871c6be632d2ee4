use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::HourlyDataPoint;

/// One saved dataset per email. Field names match the `call_analytics` table
/// columns so the struct doubles as the wire row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hourly_data: Vec<HourlyDataPoint>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn new(email: impl Into<String>, hourly_data: Vec<HourlyDataPoint>) -> Self {
        Self {
            email: email.into(),
            hourly_data,
            updated_at: None,
        }
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<HourlyDataPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<HourlyDataPoint>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_table_row() {
        let row = json!({
            "email": "a@b.com",
            "hourly_data": [
                {"hour": "00:00", "calls": 10, "duration": 100},
                {"hour": "04:00", "calls": 3, "duration": 40}
            ],
            "updated_at": "2026-10-01T08:30:00+00:00"
        });

        let record: UserRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.email, "a@b.com");
        assert_eq!(
            record.hourly_data,
            vec![
                HourlyDataPoint::new("00:00", 10, 100),
                HourlyDataPoint::new("04:00", 3, 40),
            ]
        );
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn null_hourly_data_reads_as_empty() {
        let record: UserRecord =
            serde_json::from_value(json!({"email": "a@b.com", "hourly_data": null})).unwrap();
        assert!(record.hourly_data.is_empty());
        assert_eq!(record.updated_at, None);
    }

    #[test]
    fn negative_counts_are_rejected() {
        let row = json!({
            "email": "a@b.com",
            "hourly_data": [{"hour": "00:00", "calls": -1, "duration": 0}]
        });
        assert!(serde_json::from_value::<UserRecord>(row).is_err());
    }
}
