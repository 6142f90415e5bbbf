//! The allocation ledger: the only write path for a voter's allocations.
//!
//! `allocate` is a set-to, not an increment. The admission check prices the
//! requested value against everything else the voter holds:
//!
//! ```text
//! other    = credits_used − cost(current)
//! admitted = other + cost(votes) ≤ credits
//! ```
//!
//! Repeating a call with the same value is a no-op. There is no history and no
//! rate limit; the last write wins until the proposal is distributed.

use quadfund_types::{Credits, ProposalId, VoterId, Votes};
use serde::Serialize;
use tracing::debug;

use crate::cost::quadratic_cost;
use crate::error::LedgerError;
use crate::registry::Registry;

/// Outcome of a successful allocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReceipt {
    pub voter_id: VoterId,
    pub proposal_id: ProposalId,
    pub votes: Votes,
    /// `cost(votes)` for this allocation alone.
    pub credits_cost: Credits,
    /// Budget left across all proposals after the change.
    pub credits_remaining: Credits,
}

impl Registry {
    /// Set `voter`'s allocation on `proposal` to exactly `votes`.
    ///
    /// Checks run in order: proposal exists, proposal is active, voter exists,
    /// budget admits the new value.
    pub fn allocate(
        &mut self,
        voter_id: &VoterId,
        proposal_id: &ProposalId,
        votes: Votes,
    ) -> Result<AllocationReceipt, LedgerError> {
        let proposal = self.proposal(proposal_id)?;
        if !proposal.is_active() {
            return Err(LedgerError::ProposalNotActive(proposal_id.clone()));
        }

        let voter = self
            .voters
            .get_mut(voter_id)
            .ok_or_else(|| LedgerError::VoterNotFound(voter_id.clone()))?;

        let current = voter.allocation(proposal_id);
        let other_used = voter
            .credits_used()
            .saturating_sub(quadratic_cost(current));
        let required = quadratic_cost(votes);

        if other_used.saturating_add(required) > voter.credits {
            let available = voter.credits.saturating_sub(other_used);
            debug!(
                voter = %voter_id,
                proposal = %proposal_id,
                votes,
                available,
                required,
                "allocation rejected"
            );
            return Err(LedgerError::InsufficientCredits {
                available,
                required,
            });
        }

        voter.set_allocation(proposal_id, votes);
        let credits_remaining = voter.credits - (other_used + required);

        let contributors = self.contributors.entry(proposal_id.clone()).or_default();
        if votes == 0 {
            contributors.remove(voter_id);
        } else {
            contributors.insert(voter_id.clone());
        }

        Ok(AllocationReceipt {
            voter_id: voter_id.clone(),
            proposal_id: proposal_id.clone(),
            votes,
            credits_cost: required,
            credits_remaining,
        })
    }
}
