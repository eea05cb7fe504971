use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    error::{PollError, internal_error, invalid_option},
    types::{OptionIndex, VoterId},
};

/// Voter identities surfaced per option in a snapshot.
pub const VOTER_SAMPLE_SIZE: usize = 3;

/// Mutable per-poll record of which voter selected which options. Owned
/// exclusively by one reconciler for the poll's lifetime; option keys are
/// exactly `0..option_count` and are never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteLedger {
    votes_by_option: BTreeMap<OptionIndex, BTreeSet<VoterId>>,
    allow_multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total: usize,
    pub per_option: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSnapshot {
    pub count: usize,
    /// Up to [`VOTER_SAMPLE_SIZE`] identities in deterministic order.
    pub sampled_voters: Vec<VoterId>,
}

/// Immutable copy of the ledger sufficient for rendering, decoupled from any
/// later mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub total: usize,
    pub options: Vec<OptionSnapshot>,
}

impl VoteLedger {
    pub fn new(option_count: usize, allow_multiple: bool) -> Self {
        let votes_by_option = (0..option_count)
            .map(|index| (index, BTreeSet::new()))
            .collect();
        Self {
            votes_by_option,
            allow_multiple,
        }
    }

    pub fn option_count(&self) -> usize {
        self.votes_by_option.len()
    }

    /// Adds the voter to the option's set. Single-choice ledgers first remove
    /// the voter from every other option. Returns whether anything changed;
    /// a vote already present is a no-op, not an error.
    pub fn apply_vote(
        &mut self,
        option_index: OptionIndex,
        voter: &VoterId,
    ) -> Result<bool, PollError> {
        self.check_range(option_index)?;

        let mut changed = false;
        if !self.allow_multiple {
            for (index, voters) in self.votes_by_option.iter_mut() {
                if *index != option_index && voters.remove(voter) {
                    changed = true;
                }
            }
        }

        let voters = self
            .votes_by_option
            .get_mut(&option_index)
            .ok_or_else(|| internal_error("option key missing from ledger"))?;
        if voters.insert(voter.clone()) {
            changed = true;
        }
        Ok(changed)
    }

    /// Removes the voter from the option's set if present; no-op otherwise.
    pub fn retract_vote(
        &mut self,
        option_index: OptionIndex,
        voter: &VoterId,
    ) -> Result<bool, PollError> {
        self.check_range(option_index)?;
        let voters = self
            .votes_by_option
            .get_mut(&option_index)
            .ok_or_else(|| internal_error("option key missing from ledger"))?;
        Ok(voters.remove(voter))
    }

    pub fn tally(&self) -> Tally {
        let per_option: Vec<usize> = self
            .votes_by_option
            .values()
            .map(|voters| voters.len())
            .collect();
        Tally {
            total: per_option.iter().sum(),
            per_option,
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let options: Vec<OptionSnapshot> = self
            .votes_by_option
            .values()
            .map(|voters| OptionSnapshot {
                count: voters.len(),
                sampled_voters: voters.iter().take(VOTER_SAMPLE_SIZE).cloned().collect(),
            })
            .collect();
        LedgerSnapshot {
            total: options.iter().map(|option| option.count).sum(),
            options,
        }
    }

    fn check_range(&self, option_index: OptionIndex) -> Result<(), PollError> {
        if option_index >= self.votes_by_option.len() {
            return Err(invalid_option(format!(
                "option index {} out of range 0..{}",
                option_index,
                self.votes_by_option.len()
            )));
        }
        Ok(())
    }
}
