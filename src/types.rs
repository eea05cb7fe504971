use serde::{Deserialize, Serialize};

pub type PollId = String;
pub type VoterId = String;
pub type OptionIndex = usize;

/// Where an inbound vote event originated. Bot-originated events are dropped
/// at the reconciler boundary; the ledger only ever sees user votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOrigin {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoteEvent {
    Vote {
        option_index: OptionIndex,
        voter: VoterId,
        origin: VoteOrigin,
    },
    Retract {
        option_index: OptionIndex,
        voter: VoterId,
        origin: VoteOrigin,
    },
}

impl VoteEvent {
    pub fn origin(&self) -> VoteOrigin {
        match self {
            VoteEvent::Vote { origin, .. } | VoteEvent::Retract { origin, .. } => *origin,
        }
    }

    pub fn option_index(&self) -> OptionIndex {
        match self {
            VoteEvent::Vote { option_index, .. } | VoteEvent::Retract { option_index, .. } => {
                *option_index
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    Open,
    Closing,
    Closed,
}
