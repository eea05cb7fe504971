use async_trait::async_trait;

use crate::{
    error::PollError,
    ports::{MarkerSinkPort, RenderSinkPort},
    projector::DisplayPayload,
    types::{OptionIndex, PollId},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderSink;

#[async_trait]
impl RenderSinkPort for NoopRenderSink {
    async fn update_display(
        &self,
        _poll_id: &PollId,
        _payload: DisplayPayload,
    ) -> Result<(), PollError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMarkerSink;

#[async_trait]
impl MarkerSinkPort for NoopMarkerSink {
    async fn register_marker(
        &self,
        _poll_id: &PollId,
        _option_index: OptionIndex,
    ) -> Result<(), PollError> {
        Ok(())
    }

    async fn clear_markers(&self, _poll_id: &PollId) -> Result<(), PollError> {
        Ok(())
    }
}
