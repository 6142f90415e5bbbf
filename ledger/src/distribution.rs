//! Distribution bookkeeping.
//!
//! The registry never performs transfers. It computes the fee/payout split,
//! marks the proposal as in flight while the caller runs the two transfers
//! outside any lock, and records the outcome afterwards.
//!
//! A zero pool is a successful no-op that leaves the proposal `Active`. A
//! failed attempt leaves no trace: the proposal stays `Active` and the next
//! attempt issues both transfers again.

use quadfund_types::{Amount, ProposalId, TxRef};
use tracing::debug;

use crate::error::LedgerError;
use crate::proposal::{Proposal, ProposalStatus};
use crate::registry::Registry;

/// Exact integer split of a funding pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    pub pool: Amount,
    pub fee: Amount,
    pub payout: Amount,
}

impl FeeSplit {
    /// `fee = floor(pool * fee_bps / 10_000)`, `payout = pool − fee`.
    pub fn compute(pool: Amount, fee_bps: u32) -> Self {
        let fee = pool.basis_points(fee_bps.min(10_000));
        let payout = pool.checked_sub(fee).unwrap_or(Amount::ZERO);
        Self { pool, fee, payout }
    }
}

/// A distribution that needs transfers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDistribution {
    pub proposal_id: ProposalId,
    pub split: FeeSplit,
}

impl PendingDistribution {
    /// Tiny pools can round the fee down to zero.
    pub fn needs_fee_transfer(&self) -> bool {
        !self.split.fee.is_zero()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DistributionPlan {
    /// Pool is zero: nothing to transfer, status untouched.
    NothingToDistribute,
    Transfer(PendingDistribution),
}

impl Registry {
    /// Validate and reserve a proposal for distribution.
    ///
    /// On `Transfer` the proposal is marked in flight; the caller must finish
    /// with [`Registry::complete_distribution`] or [`Registry::abort_distribution`].
    pub fn begin_distribution(
        &mut self,
        id: &ProposalId,
        fee_bps: u32,
    ) -> Result<DistributionPlan, LedgerError> {
        let proposal = self.proposal(id)?;
        if !proposal.is_active() {
            return Err(LedgerError::ProposalNotActive(id.clone()));
        }
        if self.distributing.contains(id) {
            return Err(LedgerError::DistributionInProgress(id.clone()));
        }
        if proposal.funding_pool.is_zero() {
            debug!(proposal = %id, "zero funding pool, nothing to distribute");
            return Ok(DistributionPlan::NothingToDistribute);
        }

        let pending = PendingDistribution {
            proposal_id: id.clone(),
            split: FeeSplit::compute(proposal.funding_pool, fee_bps),
        };
        self.distributing.insert(id.clone());
        Ok(DistributionPlan::Transfer(pending))
    }

    /// Both transfers confirmed: settle the proposal.
    pub fn complete_distribution(
        &mut self,
        id: &ProposalId,
        payout_tx: TxRef,
    ) -> Result<&Proposal, LedgerError> {
        self.distributing.remove(id);
        let proposal = self.proposal_mut(id)?;
        proposal.status = ProposalStatus::Distributed;
        proposal.distribution_tx = Some(payout_tx);
        Ok(proposal)
    }

    /// A transfer failed or the attempt was abandoned: release the
    /// reservation. The proposal stays `Active`. Returns whether a
    /// reservation was held.
    pub fn abort_distribution(&mut self, id: &ProposalId) -> bool {
        let held = self.distributing.remove(id);
        if held {
            debug!(proposal = %id, "distribution reservation released");
        }
        held
    }

    pub fn is_distributing(&self, id: &ProposalId) -> bool {
        self.distributing.contains(id)
    }
}
