//! Voter and proposal registries.
//!
//! One `Registry` is constructed at process start and injected into the
//! service; tests build a fresh one each. Besides the two collections it keeps
//! a contributor index (proposal → voters with a positive allocation) that the
//! allocation path updates together with the voter's own map, so reporting
//! reads O(contributors) instead of scanning every voter.

use quadfund_types::{Address, Amount, Credits, ProposalId, VoterId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::error::LedgerError;
use crate::proposal::{Proposal, ProposalStatus};
use crate::voter::Voter;

/// Budget given to voters registered without an explicit amount.
pub const DEFAULT_CREDITS: Credits = 100;

pub struct Registry {
    pub(crate) voters: BTreeMap<VoterId, Voter>,
    pub(crate) proposals: HashMap<ProposalId, Proposal>,
    /// Proposal ids in creation order.
    pub(crate) proposal_order: Vec<ProposalId>,
    pub(crate) contributors: HashMap<ProposalId, BTreeSet<VoterId>>,
    /// Proposals with a distribution currently awaiting transfers.
    pub(crate) distributing: HashSet<ProposalId>,
    next_proposal: u64,
    default_credits: Credits,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_default_credits(DEFAULT_CREDITS)
    }

    pub fn with_default_credits(default_credits: Credits) -> Self {
        Self {
            voters: BTreeMap::new(),
            proposals: HashMap::new(),
            proposal_order: Vec::new(),
            contributors: HashMap::new(),
            distributing: HashSet::new(),
            next_proposal: 1,
            default_credits,
        }
    }

    pub fn default_credits(&self) -> Credits {
        self.default_credits
    }

    // ── Voters ──────────────────────────────────────────────────────────

    /// Register a voter with `credits`, or the registry default when `None`.
    pub fn register_voter(
        &mut self,
        id: VoterId,
        credits: Option<Credits>,
    ) -> Result<&Voter, LedgerError> {
        if id.as_str().trim().is_empty() {
            return Err(LedgerError::InvalidInput("voter id is required".into()));
        }
        if self.voters.contains_key(&id) {
            return Err(LedgerError::VoterExists(id));
        }
        let credits = credits.unwrap_or(self.default_credits);
        debug!(voter = %id, credits, "registering voter");
        Ok(self
            .voters
            .entry(id.clone())
            .or_insert_with(|| Voter::new(id, credits)))
    }

    /// Increase a voter's budget. Budgets never shrink.
    pub fn add_credits(&mut self, id: &VoterId, amount: Credits) -> Result<&Voter, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidInput(
                "credit amount must be positive".into(),
            ));
        }
        let voter = self
            .voters
            .get_mut(id)
            .ok_or_else(|| LedgerError::VoterNotFound(id.clone()))?;
        voter.credits = voter
            .credits
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(voter)
    }

    pub fn voter(&self, id: &VoterId) -> Result<&Voter, LedgerError> {
        self.voters
            .get(id)
            .ok_or_else(|| LedgerError::VoterNotFound(id.clone()))
    }

    /// Voters in registry order (by id).
    pub fn voters(&self) -> impl Iterator<Item = &Voter> {
        self.voters.values()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Drop a voter and all of its allocations. Cleanup paths only.
    pub fn remove_voter(&mut self, id: &VoterId) -> Option<Voter> {
        let voter = self.voters.remove(id)?;
        for (proposal, _) in voter.allocations() {
            if let Some(set) = self.contributors.get_mut(proposal) {
                set.remove(id);
            }
        }
        Some(voter)
    }

    // ── Proposals ───────────────────────────────────────────────────────

    /// Create an `Active` proposal and return it.
    pub fn create_proposal(
        &mut self,
        title: &str,
        description: Option<String>,
        funding_pool: Amount,
        created_by: Address,
    ) -> Result<&Proposal, LedgerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LedgerError::InvalidInput("title is required".into()));
        }
        let id = ProposalId::sequential(self.next_proposal);
        self.next_proposal += 1;

        let proposal = Proposal {
            id: id.clone(),
            title: title.to_string(),
            description: description.filter(|d| !d.trim().is_empty()),
            funding_pool,
            created_by,
            status: ProposalStatus::Active,
            distribution_tx: None,
        };
        debug!(proposal = %id, pool = %funding_pool, "creating proposal");
        self.proposal_order.push(id.clone());
        Ok(self.proposals.entry(id).or_insert(proposal))
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, LedgerError> {
        self.proposals
            .get(id)
            .ok_or_else(|| LedgerError::ProposalNotFound(id.clone()))
    }

    /// Proposals in creation order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposal_order
            .iter()
            .filter_map(|id| self.proposals.get(id))
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    pub(crate) fn proposal_mut(&mut self, id: &ProposalId) -> Result<&mut Proposal, LedgerError> {
        self.proposals
            .get_mut(id)
            .ok_or_else(|| LedgerError::ProposalNotFound(id.clone()))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
