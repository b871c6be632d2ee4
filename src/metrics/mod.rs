mod types;

pub use types::{CallMetrics, ChartSlice};

use crate::models::HourlyDataPoint;

/// Percentage of calls counted as successful.
const SUCCESS_PERCENT: u64 = 92;
/// Percentage of calls counted as failed. Flooring both shares means they can
/// sum to one less than the total.
const FAILURE_PERCENT: u64 = 8;

pub fn derive_metrics(points: &[HourlyDataPoint]) -> CallMetrics {
    let total_calls: u64 = points.iter().map(|point| u64::from(point.calls)).sum();
    let total_duration: u64 = points.iter().map(|point| u64::from(point.duration)).sum();

    let average_duration = if points.is_empty() {
        0
    } else {
        total_duration / points.len() as u64
    };

    CallMetrics {
        total_calls,
        successful_calls: percent_of(total_calls, SUCCESS_PERCENT),
        failed_calls: percent_of(total_calls, FAILURE_PERCENT),
        average_duration,
    }
}

pub fn success_breakdown(metrics: &CallMetrics) -> Vec<ChartSlice> {
    vec![
        ChartSlice {
            name: "Successful".into(),
            value: metrics.successful_calls,
        },
        ChartSlice {
            name: "Failed".into(),
            value: metrics.failed_calls,
        },
    ]
}

fn percent_of(total: u64, percent: u64) -> u64 {
    (u128::from(total) * u128::from(percent) / 100) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_hourly_data;

    #[test]
    fn default_dataset_metrics() {
        let metrics = derive_metrics(&default_hourly_data());

        assert_eq!(metrics.total_calls, 518);
        assert_eq!(metrics.successful_calls, 476);
        assert_eq!(metrics.failed_calls, 41);
        assert_eq!(metrics.average_duration, 455);
    }

    #[test]
    fn empty_dataset_has_zero_average() {
        assert_eq!(derive_metrics(&[]), CallMetrics::default());
    }

    #[test]
    fn success_and_failure_fall_short_by_at_most_one() {
        for calls in 0..=2_000u32 {
            let metrics = derive_metrics(&[HourlyDataPoint::new("00:00", calls, 0)]);
            let accounted = metrics.successful_calls + metrics.failed_calls;
            assert!(accounted <= metrics.total_calls, "calls={calls}");
            assert!(metrics.total_calls - accounted <= 1, "calls={calls}");
        }
    }

    #[test]
    fn average_duration_is_floored() {
        let points = vec![
            HourlyDataPoint::new("00:00", 1, 10),
            HourlyDataPoint::new("04:00", 1, 11),
        ];
        assert_eq!(derive_metrics(&points).average_duration, 10);
    }

    #[test]
    fn large_counts_do_not_overflow() {
        let points = vec![HourlyDataPoint::new("00:00", u32::MAX, u32::MAX); 4];
        let metrics = derive_metrics(&points);
        assert_eq!(metrics.total_calls, 4 * u64::from(u32::MAX));
        assert_eq!(metrics.average_duration, u64::from(u32::MAX));
    }

    #[test]
    fn breakdown_mirrors_metrics() {
        let metrics = derive_metrics(&default_hourly_data());
        let slices = success_breakdown(&metrics);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].name, "Successful");
        assert_eq!(slices[0].value, 476);
        assert_eq!(slices[1].name, "Failed");
        assert_eq!(slices[1].value, 41);
    }
}
