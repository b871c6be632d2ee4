pub mod hourly;
pub mod record;

pub use hourly::{
    default_hourly_data, duration_distribution, parse_field_value, DurationBucket,
    HourlyDataPoint, HourlyField,
};
pub use record::UserRecord;
