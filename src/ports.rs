use async_trait::async_trait;

use crate::{
    error::PollError,
    projector::DisplayPayload,
    types::{OptionIndex, PollId},
};

/// Outbound surface showing the poll. Receives the full payload on every
/// change and must replace, not append.
#[async_trait]
pub trait RenderSinkPort: Send + Sync {
    async fn update_display(
        &self,
        poll_id: &PollId,
        payload: DisplayPayload,
    ) -> Result<(), PollError>;
}

/// Outbound surface carrying the vote-casting affordances, one marker per
/// option. Registration is idempotent on the sink side.
#[async_trait]
pub trait MarkerSinkPort: Send + Sync {
    async fn register_marker(
        &self,
        poll_id: &PollId,
        option_index: OptionIndex,
    ) -> Result<(), PollError>;

    async fn clear_markers(&self, poll_id: &PollId) -> Result<(), PollError>;
}
