//! Everything the webview needs to draw the dashboard in one payload.

use serde::Serialize;

use crate::{
    metrics::{derive_metrics, success_breakdown, CallMetrics, ChartSlice},
    models::{duration_distribution, DurationBucket},
    session::SessionSnapshot,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub session: SessionSnapshot,
    /// Derived from the displayed dataset, never the edit buffer.
    pub metrics: CallMetrics,
    pub success_breakdown: Vec<ChartSlice>,
    pub duration_distribution: Vec<DurationBucket>,
    /// False when running without remote credentials ("demo mode").
    pub remote_configured: bool,
}

impl DashboardView {
    pub fn new(session: SessionSnapshot, remote_configured: bool) -> Self {
        let metrics = derive_metrics(&session.displayed);
        Self {
            success_breakdown: success_breakdown(&metrics),
            metrics,
            duration_distribution: duration_distribution(),
            session,
            remote_configured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_hourly_data, HourlyDataPoint};
    use crate::session::{SessionPhase, SessionState};

    #[test]
    fn metrics_follow_displayed_data_only() {
        let mut state = SessionState::new(default_hourly_data());
        state.transition(SessionPhase::Editing {
            buffer: vec![HourlyDataPoint::new("00:00", 1, 1)],
        });

        let view = DashboardView::new(state.snapshot(), false);

        assert_eq!(view.metrics.total_calls, 518);
        assert_eq!(view.success_breakdown[0].value, 476);
        assert_eq!(view.duration_distribution.len(), 5);
        assert!(!view.remote_configured);
    }

    #[test]
    fn serializes_for_webview() {
        let view = DashboardView::new(SessionState::new(Vec::new()).snapshot(), true);
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["metrics"]["averageDuration"], 0);
        assert_eq!(value["remoteConfigured"], true);
        assert_eq!(value["session"]["phase"], "viewing");
        assert_eq!(value["durationDistribution"][0]["range"], "0-2 min");
        assert_eq!(value["durationDistribution"][0]["count"], 145);
        assert_eq!(value["successBreakdown"][0]["name"], "Successful");
        assert_eq!(value["successBreakdown"][1]["value"], 0);
    }
}
