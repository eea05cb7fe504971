use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
};

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    config::EngineConfig,
    definition::CreatePollRequest,
    error::{PollError, poll_closed, unknown_poll, validation_error},
    markers::{MarkerSetup, register_markers},
    ports::{MarkerSinkPort, RenderSinkPort},
    projector::project,
    reconciler::Reconciler,
    runtime::{PollHandle, PollRuntime, PollTable},
    types::{OptionIndex, PollId, VoteEvent, VoteOrigin, VoterId},
};

#[derive(Debug, Clone)]
pub struct StartedPoll {
    pub poll_id: PollId,
    pub markers: MarkerSetup,
}

/// Facade over all live polls. Each poll runs on its own task with its own
/// ledger; polls are fully independent and one poll's failure never touches
/// another's state.
pub struct PollEngine {
    config: EngineConfig,
    render_sink: Arc<dyn RenderSinkPort>,
    marker_sink: Arc<dyn MarkerSinkPort>,
    polls: PollTable,
}

impl PollEngine {
    pub fn new(
        config: EngineConfig,
        render_sink: Arc<dyn RenderSinkPort>,
        marker_sink: Arc<dyn MarkerSinkPort>,
    ) -> Self {
        Self {
            config,
            render_sink,
            marker_sink,
            polls: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Validates the request, pushes the initial render, registers the
    /// per-option markers, and spawns the poll's runtime. Marker setup may
    /// come back partial; the poll still starts with whatever registered.
    pub async fn start_poll(
        &self,
        poll_id: PollId,
        request: CreatePollRequest,
    ) -> Result<StartedPoll, PollError> {
        if self.polls.lock().await.contains_key(&poll_id) {
            return Err(validation_error(format!(
                "poll '{}' already exists",
                poll_id
            )));
        }

        let definition = request.into_definition()?;
        let reconciler = Reconciler::new(definition);

        let initial = project(reconciler.definition(), &reconciler.snapshot());
        if let Err(err) = self.render_sink.update_display(&poll_id, initial).await {
            tracing::warn!(
                target: "engine",
                poll_id = %poll_id,
                error = %err,
                "initial_display_update_failed"
            );
        }

        let markers = register_markers(
            self.marker_sink.as_ref(),
            &poll_id,
            reconciler.definition().option_count(),
            &self.config.markers,
        )
        .await;

        let (events_tx, events_rx) = mpsc::channel(self.config.event_queue_capacity);
        let cancel = CancellationToken::new();
        {
            let mut polls = self.polls.lock().await;
            match polls.entry(poll_id.clone()) {
                Entry::Occupied(_) => {
                    return Err(validation_error(format!(
                        "poll '{}' already exists",
                        poll_id
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(PollHandle {
                        events_tx,
                        cancel: cancel.clone(),
                    });
                }
            }
        }

        let runtime = PollRuntime {
            poll_id: poll_id.clone(),
            reconciler,
            events_rx,
            cancel,
            render_sink: Arc::clone(&self.render_sink),
            marker_sink: Arc::clone(&self.marker_sink),
            polls: Arc::clone(&self.polls),
        };
        tokio::spawn(runtime.run());

        tracing::info!(
            target: "engine",
            poll_id = %poll_id,
            markers_registered = markers.registered.len(),
            markers_complete = markers.is_complete(),
            "poll_started"
        );

        Ok(StartedPoll { poll_id, markers })
    }

    pub async fn vote(
        &self,
        poll_id: &PollId,
        option_index: OptionIndex,
        voter: VoterId,
    ) -> Result<(), PollError> {
        self.submit(
            poll_id,
            VoteEvent::Vote {
                option_index,
                voter,
                origin: VoteOrigin::User,
            },
        )
        .await
    }

    pub async fn unvote(
        &self,
        poll_id: &PollId,
        option_index: OptionIndex,
        voter: VoterId,
    ) -> Result<(), PollError> {
        self.submit(
            poll_id,
            VoteEvent::Retract {
                option_index,
                voter,
                origin: VoteOrigin::User,
            },
        )
        .await
    }

    /// Routes one inbound event to the poll's serialized queue. Callers that
    /// need to flag bot-originated events construct the [`VoteEvent`]
    /// themselves.
    pub async fn submit(&self, poll_id: &PollId, event: VoteEvent) -> Result<(), PollError> {
        let events_tx = {
            let polls = self.polls.lock().await;
            let handle = polls
                .get(poll_id)
                .ok_or_else(|| unknown_poll(format!("no live poll '{}'", poll_id)))?;
            handle.events_tx.clone()
        };
        events_tx
            .send(event)
            .await
            .map_err(|_| poll_closed(format!("poll '{}' stopped accepting events", poll_id)))
    }

    /// Explicit close; idempotent, and a no-op for unknown or already closed
    /// polls.
    pub async fn close(&self, poll_id: &PollId) {
        let polls = self.polls.lock().await;
        if let Some(handle) = polls.get(poll_id) {
            handle.cancel.cancel();
        }
    }

    pub async fn is_live(&self, poll_id: &PollId) -> bool {
        self.polls.lock().await.contains_key(poll_id)
    }
}
