use std::time::Duration;

use crate::{
    config::MarkerConfig,
    error::{PollError, marker_registration_error},
    ports::MarkerSinkPort,
    types::{OptionIndex, PollId},
};

/// Outcome of marker registration. The poll starts either way; `failure`
/// names the first option whose marker could not be registered, and every
/// option from there on lacks a casting affordance.
#[derive(Debug, Clone)]
pub struct MarkerSetup {
    pub registered: Vec<OptionIndex>,
    pub failure: Option<PollError>,
}

impl MarkerSetup {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Registers one marker per option, sequentially with a fixed gap between
/// registrations and bounded retry per marker. Exhausting the retries for
/// one marker aborts the remaining registrations.
pub async fn register_markers(
    sink: &dyn MarkerSinkPort,
    poll_id: &PollId,
    option_count: usize,
    config: &MarkerConfig,
) -> MarkerSetup {
    let mut registered = Vec::with_capacity(option_count);

    for option_index in 0..option_count {
        match register_one(sink, poll_id, option_index, config).await {
            Ok(()) => {
                registered.push(option_index);
                tokio::time::sleep(Duration::from_millis(config.spacing_ms)).await;
            }
            Err(err) => {
                tracing::warn!(
                    target: "markers",
                    poll_id = %poll_id,
                    option_index,
                    error = %err,
                    "marker_registration_exhausted"
                );
                return MarkerSetup {
                    registered,
                    failure: Some(marker_registration_error(format!(
                        "marker for option {} failed after {} attempts: {}",
                        option_index, config.attempts, err
                    ))),
                };
            }
        }
    }

    MarkerSetup {
        registered,
        failure: None,
    }
}

async fn register_one(
    sink: &dyn MarkerSinkPort,
    poll_id: &PollId,
    option_index: OptionIndex,
    config: &MarkerConfig,
) -> Result<(), PollError> {
    let attempts = config.attempts.max(1);
    let mut last_err = None;
    for attempt in 1..=attempts {
        match sink.register_marker(poll_id, option_index).await {
            Ok(()) => return Ok(()),
            Err(err) => {
                tracing::debug!(
                    target: "markers",
                    poll_id = %poll_id,
                    option_index,
                    attempt,
                    error = %err,
                    "marker_registration_retry"
                );
                last_err = Some(err);
                if attempt < attempts {
                    tokio::time::sleep(Duration::from_millis(config.backoff_ms)).await;
                }
            }
        }
    }
    Err(last_err
        .unwrap_or_else(|| marker_registration_error("marker registration failed without error")))
}
