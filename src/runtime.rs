use std::{collections::BTreeMap, sync::Arc};

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    ports::{MarkerSinkPort, RenderSinkPort},
    projector::{project, project_ended},
    reconciler::{EventOutcome, Reconciler},
    types::{PollId, VoteEvent},
};

/// Routing entry for one live poll: the event queue feeding its runtime task
/// and the token that triggers an explicit close.
pub(crate) struct PollHandle {
    pub(crate) events_tx: mpsc::Sender<VoteEvent>,
    pub(crate) cancel: CancellationToken,
}

pub(crate) type PollTable = Arc<Mutex<BTreeMap<PollId, PollHandle>>>;

/// Single logical writer for one poll. Owns the reconciler and serializes
/// everything that touches the ledger; suspensions on the render sink never
/// block other polls.
pub(crate) struct PollRuntime {
    pub(crate) poll_id: PollId,
    pub(crate) reconciler: Reconciler,
    pub(crate) events_rx: mpsc::Receiver<VoteEvent>,
    pub(crate) cancel: CancellationToken,
    pub(crate) render_sink: Arc<dyn RenderSinkPort>,
    pub(crate) marker_sink: Arc<dyn MarkerSinkPort>,
    pub(crate) polls: PollTable,
}

impl PollRuntime {
    pub(crate) async fn run(mut self) {
        let cancel = self.cancel.clone();
        let expires_after = self.reconciler.definition().expires_after();
        let expiry = async move {
            match expires_after {
                Some(after) => tokio::time::sleep(after).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(expiry);

        loop {
            tokio::select! {
                () = &mut expiry => {
                    tracing::info!(target: "runtime", poll_id = %self.poll_id, "poll_expired");
                    break;
                }
                () = cancel.cancelled() => {
                    tracing::info!(target: "runtime", poll_id = %self.poll_id, "poll_close_requested");
                    break;
                }
                event = self.events_rx.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_event(&event).await;
                }
            }
        }

        self.close().await;
    }

    async fn handle_event(&mut self, event: &VoteEvent) {
        match self.reconciler.apply(event) {
            Ok(EventOutcome::Applied(snapshot)) => {
                let payload = project(self.reconciler.definition(), &snapshot);
                if let Err(err) = self.render_sink.update_display(&self.poll_id, payload).await {
                    // Ledger state stays authoritative; the next successful
                    // push reflects it.
                    tracing::warn!(
                        target: "runtime",
                        poll_id = %self.poll_id,
                        error = %err,
                        "display_update_failed"
                    );
                }
            }
            Ok(EventOutcome::Unchanged | EventOutcome::Dropped) => {}
            Err(err) => {
                tracing::warn!(
                    target: "runtime",
                    poll_id = %self.poll_id,
                    error = %err,
                    "event_rejected"
                );
            }
        }
    }

    async fn close(mut self) {
        // State check first: a timer fire racing an explicit close resolves
        // here, not through timer cancellation.
        if !self.reconciler.begin_close() {
            return;
        }

        self.events_rx.close();
        while let Ok(event) = self.events_rx.try_recv() {
            if let Err(err) = self.reconciler.apply_inflight(&event) {
                tracing::warn!(
                    target: "runtime",
                    poll_id = %self.poll_id,
                    error = %err,
                    "inflight_event_rejected"
                );
            }
        }

        let final_snapshot = self.reconciler.finish_close();
        let payload = project_ended(self.reconciler.definition(), &final_snapshot);
        if let Err(err) = self.render_sink.update_display(&self.poll_id, payload).await {
            tracing::warn!(
                target: "runtime",
                poll_id = %self.poll_id,
                error = %err,
                "final_display_update_failed"
            );
        }
        if let Err(err) = self.marker_sink.clear_markers(&self.poll_id).await {
            tracing::warn!(
                target: "runtime",
                poll_id = %self.poll_id,
                error = %err,
                "marker_clear_failed"
            );
        }

        self.polls.lock().await.remove(&self.poll_id);
        tracing::info!(target: "runtime", poll_id = %self.poll_id, "poll_closed");
    }
}
