//! Read-only views over the registry.

use quadfund_types::{Address, Amount, Credits, ProposalId, TxRef, VoterId, Votes};

use crate::cost::quadratic_cost;
use crate::error::LedgerError;
use crate::proposal::{Proposal, ProposalStatus};
use crate::registry::Registry;

/// One line of a voter's allocation breakdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationLine {
    pub proposal_id: ProposalId,
    pub votes: Votes,
    pub credits_cost: Credits,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterStatus {
    pub voter_id: VoterId,
    pub credits: Credits,
    pub credits_used: Credits,
    pub credits_remaining: Credits,
    pub allocations: Vec<AllocationLine>,
}

/// A proposal with its vote tally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalSummary {
    pub id: ProposalId,
    pub title: String,
    pub description: Option<String>,
    pub funding_pool: Amount,
    pub status: ProposalStatus,
    pub distribution_tx: Option<TxRef>,
    pub total_votes: u128,
    pub voter_count: usize,
}

/// One contributing voter in a proposal detail view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContributorLine {
    pub voter_id: VoterId,
    pub votes: Votes,
    pub credits_cost: Credits,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalDetail {
    pub summary: ProposalSummary,
    pub created_by: Address,
    /// Voters with a positive allocation, in registry order.
    pub contributors: Vec<ContributorLine>,
}

impl Registry {
    pub fn voter_status(&self, id: &VoterId) -> Result<VoterStatus, LedgerError> {
        let voter = self.voter(id)?;
        let credits_used = voter.credits_used();
        Ok(VoterStatus {
            voter_id: voter.id.clone(),
            credits: voter.credits,
            credits_used,
            credits_remaining: voter.credits.saturating_sub(credits_used),
            allocations: voter
                .allocations()
                .map(|(proposal_id, votes)| AllocationLine {
                    proposal_id: proposal_id.clone(),
                    votes,
                    credits_cost: quadratic_cost(votes),
                })
                .collect(),
        })
    }

    /// Every proposal with its tally, in creation order.
    pub fn list_proposals(&self) -> Vec<ProposalSummary> {
        self.proposals()
            .map(|p| self.summarize(p, &self.contributor_lines(&p.id)))
            .collect()
    }

    pub fn proposal_detail(&self, id: &ProposalId) -> Result<ProposalDetail, LedgerError> {
        let proposal = self.proposal(id)?;
        let contributors = self.contributor_lines(id);
        Ok(ProposalDetail {
            summary: self.summarize(proposal, &contributors),
            created_by: proposal.created_by.clone(),
            contributors,
        })
    }

    fn summarize(&self, p: &Proposal, contributors: &[ContributorLine]) -> ProposalSummary {
        ProposalSummary {
            id: p.id.clone(),
            title: p.title.clone(),
            description: p.description.clone(),
            funding_pool: p.funding_pool,
            status: p.status,
            distribution_tx: p.distribution_tx.clone(),
            total_votes: contributors.iter().map(|c| u128::from(c.votes)).sum(),
            voter_count: contributors.len(),
        }
    }

    /// Contributors read through the index. The index set is ordered by voter
    /// id, matching registry iteration order.
    fn contributor_lines(&self, id: &ProposalId) -> Vec<ContributorLine> {
        let Some(set) = self.contributors.get(id) else {
            return Vec::new();
        };
        set.iter()
            .filter_map(|voter_id| self.voters.get(voter_id))
            .filter_map(|voter| {
                let votes = voter.allocation(id);
                (votes > 0).then(|| ContributorLine {
                    voter_id: voter.id.clone(),
                    votes,
                    credits_cost: quadratic_cost(votes),
                })
            })
            .collect()
    }
}
