use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by every capture session of a coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Period of the elapsed-time tick
    /// Default: 1 second
    pub tick_interval: Duration,

    /// Optional cap on a single capture; the coordinator stops sessions
    /// that reach it. Default: unlimited
    pub max_duration: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            max_duration: None,
        }
    }
}
