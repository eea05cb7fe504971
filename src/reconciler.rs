use crate::{
    definition::PollDefinition,
    error::{PollError, poll_closed},
    ledger::{LedgerSnapshot, VoteLedger},
    types::{PollPhase, VoteEvent, VoteOrigin},
};

/// Result of feeding one external event through the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The ledger changed; the snapshot is ready for re-projection.
    Applied(LedgerSnapshot),
    /// Recognized event that changed nothing (duplicate vote, retract of an
    /// absent vote). No re-render needed.
    Unchanged,
    /// Silently dropped at the boundary: bot-originated, or an option
    /// identifier outside the defined range.
    Dropped,
}

/// Serializes external vote/retract events into ledger mutations for one
/// poll. All mutation goes through this type; `Open → Closing → Closed`,
/// `Closed` terminal.
#[derive(Debug, Clone)]
pub struct Reconciler {
    definition: PollDefinition,
    ledger: VoteLedger,
    phase: PollPhase,
}

impl Reconciler {
    pub fn new(definition: PollDefinition) -> Self {
        let ledger = VoteLedger::new(definition.option_count(), definition.allow_multiple);
        Self {
            definition,
            ledger,
            phase: PollPhase::Open,
        }
    }

    pub fn definition(&self) -> &PollDefinition {
        &self.definition
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    /// Applies one newly arrived event. Rejected once the poll has left
    /// `Open`; the ledger is guaranteed untouched on rejection.
    pub fn apply(&mut self, event: &VoteEvent) -> Result<EventOutcome, PollError> {
        if self.phase != PollPhase::Open {
            return Err(poll_closed(format!(
                "poll no longer accepts events (phase: {:?})",
                self.phase
            )));
        }
        self.apply_event(event)
    }

    /// Applies an event that was already queued when the close began.
    /// Accepted while `Closing`; still rejected once `Closed`.
    pub fn apply_inflight(&mut self, event: &VoteEvent) -> Result<EventOutcome, PollError> {
        if self.phase == PollPhase::Closed {
            return Err(poll_closed("poll already closed"));
        }
        self.apply_event(event)
    }

    fn apply_event(&mut self, event: &VoteEvent) -> Result<EventOutcome, PollError> {
        if event.origin() == VoteOrigin::Bot {
            tracing::debug!(target: "reconciler", "bot_event_dropped");
            return Ok(EventOutcome::Dropped);
        }
        if event.option_index() >= self.definition.option_count() {
            tracing::warn!(
                target: "reconciler",
                option_index = event.option_index(),
                option_count = self.definition.option_count(),
                "unrecognized_option_dropped"
            );
            return Ok(EventOutcome::Dropped);
        }

        let changed = match event {
            VoteEvent::Vote {
                option_index,
                voter,
                ..
            } => self.ledger.apply_vote(*option_index, voter)?,
            VoteEvent::Retract {
                option_index,
                voter,
                ..
            } => self.ledger.retract_vote(*option_index, voter)?,
        };

        if changed {
            Ok(EventOutcome::Applied(self.ledger.snapshot()))
        } else {
            Ok(EventOutcome::Unchanged)
        }
    }

    /// Starts the close. Returns false if the poll is already on its way
    /// out, making close (and a late timer fire) a no-op.
    pub fn begin_close(&mut self) -> bool {
        if self.phase != PollPhase::Open {
            return false;
        }
        self.phase = PollPhase::Closing;
        true
    }

    /// Freezes the ledger and returns the final snapshot.
    pub fn finish_close(&mut self) -> LedgerSnapshot {
        self.phase = PollPhase::Closed;
        self.ledger.snapshot()
    }
}
