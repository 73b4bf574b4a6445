//! Query configuration.

use crate::domain::ScheduleTime;

/// Configuration parameters for connection queries.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Earliest departure used when a request does not give one.
    pub default_min_time: ScheduleTime,

    /// Latest arrival used when a request does not give one.
    /// Defaults to the end of the second day so overnight trips are included.
    pub default_max_time: ScheduleTime,

    /// Maximum number of connections to return, `None` for all.
    pub max_results: Option<usize>,
}

impl QueryConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        default_min_time: ScheduleTime,
        default_max_time: ScheduleTime,
        max_results: Option<usize>,
    ) -> Self {
        Self {
            default_min_time,
            default_max_time,
            max_results,
        }
    }

    /// Fill in a missing window bound from the defaults.
    pub fn window(
        &self,
        min_time: Option<ScheduleTime>,
        max_time: Option<ScheduleTime>,
    ) -> (ScheduleTime, ScheduleTime) {
        (
            min_time.unwrap_or_else(|| self.default_min_time.clone()),
            max_time.unwrap_or_else(|| self.default_max_time.clone()),
        )
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_min_time: ScheduleTime::start_of_day(),
            default_max_time: ScheduleTime::end_of_next_day(),
            max_results: None,
        }
    }
}
