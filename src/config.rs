use serde::{Deserialize, Serialize};

fn default_marker_attempts() -> u32 {
    3
}

fn default_marker_backoff_ms() -> u64 {
    2_000
}

fn default_marker_spacing_ms() -> u64 {
    1_500
}

fn default_event_queue_capacity() -> usize {
    32
}

/// Tunables for one engine instance; every poll started through the engine
/// shares them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            markers: MarkerConfig::default(),
            event_queue_capacity: default_event_queue_capacity(),
        }
    }
}

/// Marker registration pacing. The external sink rate-limits rapid
/// registration, so options are registered one at a time with a fixed gap,
/// and each registration retries a bounded number of times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    #[serde(default = "default_marker_attempts")]
    pub attempts: u32,
    #[serde(default = "default_marker_backoff_ms")]
    pub backoff_ms: u64,
    #[serde(default = "default_marker_spacing_ms")]
    pub spacing_ms: u64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            attempts: default_marker_attempts(),
            backoff_ms: default_marker_backoff_ms(),
            spacing_ms: default_marker_spacing_ms(),
        }
    }
}
