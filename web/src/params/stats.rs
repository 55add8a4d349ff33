use domain::{preferences::StatsAggregationMode, stats_kind::StatsKind};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct FilesParams {
    /// Only list files of this kind
    pub(crate) kind: Option<StatsKind>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct EventsParams {
    /// Number of events to return, clamped to 1 to 1000 (default 200)
    pub(crate) limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct SummaryParams {
    /// Overrides the session's aggregation mode
    pub(crate) mode: Option<StatsAggregationMode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;
    use domain::stats::clamp_event_limit;

    #[test]
    fn negative_event_limits_are_accepted_and_clamped() {
        let uri: Uri = "/teams/1/stats/events?limit=-3".parse().unwrap();
        let Query(params) = Query::<EventsParams>::try_from_uri(&uri).unwrap();

        assert_eq!(params.limit, Some(-3));
        assert_eq!(clamp_event_limit(params.limit), 1);
    }
}
