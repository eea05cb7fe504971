pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod markers;
pub mod noop;
pub mod ports;
pub mod projector;
pub mod reconciler;
mod runtime;
pub mod types;

pub use config::{EngineConfig, MarkerConfig};
pub use definition::{CreatePollRequest, MAX_OPTIONS, MIN_OPTIONS, PollDefinition, PollOption};
pub use engine::{PollEngine, StartedPoll};
pub use error::{PollError, PollErrorKind};
pub use ledger::{LedgerSnapshot, OptionSnapshot, Tally, VOTER_SAMPLE_SIZE, VoteLedger};
pub use markers::{MarkerSetup, register_markers};
pub use noop::{NoopMarkerSink, NoopRenderSink};
pub use ports::{MarkerSinkPort, RenderSinkPort};
pub use projector::{DisplayField, DisplayPayload, project, project_ended};
pub use reconciler::{EventOutcome, Reconciler};
pub use types::{OptionIndex, PollId, PollPhase, VoteEvent, VoteOrigin, VoterId};
