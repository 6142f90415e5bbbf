//! The quadfund service.

use quadfund_ledger::{
    AllocationReceipt, DistributionPlan, FeeSplit, LedgerError, PendingDistribution,
    ProposalDetail, ProposalSummary, Registry, VoterStatus,
};
use quadfund_payments::PaymentGateway;
use quadfund_types::{
    Address, Amount, Clock, Credits, ProposalId, SystemClock, Timestamp, TxRef, VoterId, Votes,
};
use quadfund_utils::format_duration;
use quadfund_whitelist::{Whitelist, WhitelistSource};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::NodeConfig;
use crate::error::{NodeError, TransferLeg};
use crate::metrics::NodeMetrics;

/// Result of a successful `distribute` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DistributionOutcome {
    /// The pool was zero. No transfer ran and the proposal is still active.
    NothingToDistribute { proposal_id: ProposalId },
    Distributed {
        proposal_id: ProposalId,
        recipient: Address,
        split: FeeSplit,
        /// `None` when the fee rounded to zero.
        fee_tx: Option<TxRef>,
        payout_tx: TxRef,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthReport {
    pub voters: usize,
    pub proposals: usize,
    pub started_at: Timestamp,
    pub uptime_secs: u64,
    pub whitelist_enabled: bool,
}

/// Owns the registry and every collaborator the ledger operations need.
pub struct QuadfundNode<W, P> {
    registry: Arc<RwLock<Registry>>,
    whitelist: Whitelist<W>,
    payments: P,
    treasury: Address,
    fee_bps: u32,
    metrics: NodeMetrics,
    clock: Arc<dyn Clock>,
    started_at: Timestamp,
}

/// A proposal's distribution reservation.
///
/// Settled explicitly once the transfers finish. If the owning future is
/// dropped first (client disconnect, timeout), `Drop` settles it instead, so
/// the proposal never stays reserved.
struct Reservation {
    registry: Arc<RwLock<Registry>>,
    proposal_id: ProposalId,
    /// Set once the payout is confirmed; settling then completes instead of
    /// aborting.
    payout_tx: Option<TxRef>,
    settled: bool,
}

impl Reservation {
    fn new(registry: &Arc<RwLock<Registry>>, proposal_id: &ProposalId) -> Self {
        Self {
            registry: Arc::clone(registry),
            proposal_id: proposal_id.clone(),
            payout_tx: None,
            settled: false,
        }
    }

    fn settle(&mut self, registry: &mut Registry) -> Result<(), LedgerError> {
        self.settled = true;
        apply_settlement(registry, &self.proposal_id, self.payout_tx.clone())
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(proposal = %self.proposal_id, "distribution abandoned before bookkeeping");

        let id = self.proposal_id.clone();
        let payout_tx = self.payout_tx.take();
        if let Ok(mut registry) = self.registry.try_write() {
            if let Err(e) = apply_settlement(&mut registry, &id, payout_tx) {
                warn!(proposal = %id, error = %e, "failed to settle abandoned distribution");
            }
            return;
        }

        let registry = Arc::clone(&self.registry);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let mut registry = registry.write().await;
                    if let Err(e) = apply_settlement(&mut registry, &id, payout_tx) {
                        warn!(proposal = %id, error = %e, "failed to settle abandoned distribution");
                    }
                });
            }
            Err(_) => warn!(proposal = %id, "no runtime to release distribution reservation"),
        }
    }
}

fn apply_settlement(
    registry: &mut Registry,
    id: &ProposalId,
    payout_tx: Option<TxRef>,
) -> Result<(), LedgerError> {
    match payout_tx {
        Some(tx) => registry.complete_distribution(id, tx).map(|_| ()),
        None => {
            registry.abort_distribution(id);
            Ok(())
        }
    }
}

impl<W: WhitelistSource, P: PaymentGateway> QuadfundNode<W, P> {
    pub fn new(
        config: &NodeConfig,
        whitelist: Whitelist<W>,
        payments: P,
    ) -> Result<Self, NodeError> {
        Self::with_clock(config, whitelist, payments, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &NodeConfig,
        whitelist: Whitelist<W>,
        payments: P,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NodeError> {
        if config.fee_bps >= 10_000 {
            return Err(NodeError::Config(format!(
                "fee_bps must be below 10000, got {}",
                config.fee_bps
            )));
        }
        let treasury = Address::new(config.treasury_address.as_str())
            .map_err(|_| NodeError::Config("treasury_address is required".into()))?;

        Ok(Self {
            registry: Arc::new(RwLock::new(Registry::with_default_credits(Credits::from(
                config.default_credits,
            )))),
            whitelist,
            payments,
            treasury,
            fee_bps: config.fee_bps,
            metrics: NodeMetrics::new(),
            started_at: clock.now(),
            clock,
        })
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    pub fn whitelist(&self) -> &Whitelist<W> {
        &self.whitelist
    }

    pub fn payments(&self) -> &P {
        &self.payments
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    // ── Voters ──────────────────────────────────────────────────────────
    //
    // Voter ids are addresses. They are keyed by their normalized form, the
    // same form the whitelist compares, so one address is one budget.

    pub async fn register_voter(
        &self,
        voter_id: VoterId,
        credits: Option<Credits>,
    ) -> Result<VoterStatus, NodeError> {
        let voter_id = self.require_whitelisted_voter(&voter_id).await?;

        let mut registry = self.registry.write().await;
        registry.register_voter(voter_id.clone(), credits)?;
        let status = registry.voter_status(&voter_id)?;
        self.metrics.voters_registered.inc();
        self.metrics.voter_count.set(registry.voter_count() as i64);
        info!(voter = %voter_id, credits = status.credits, "voter registered");
        Ok(status)
    }

    pub async fn add_credits(
        &self,
        voter_id: &VoterId,
        amount: Credits,
    ) -> Result<VoterStatus, NodeError> {
        let voter_id = self.require_whitelisted_voter(voter_id).await?;

        let mut registry = self.registry.write().await;
        registry.add_credits(&voter_id, amount)?;
        let status = registry.voter_status(&voter_id)?;
        info!(voter = %voter_id, added = amount, credits = status.credits, "credits added");
        Ok(status)
    }

    pub async fn voter_status(&self, voter_id: &VoterId) -> Result<VoterStatus, NodeError> {
        let voter_id = voter_key(voter_id)?;
        Ok(self.registry.read().await.voter_status(&voter_id)?)
    }

    // ── Proposals ───────────────────────────────────────────────────────

    pub async fn create_proposal(
        &self,
        creator: &str,
        title: &str,
        description: Option<String>,
        funding_pool: Amount,
    ) -> Result<ProposalDetail, NodeError> {
        let creator = self.require_whitelisted(creator).await?;

        let mut registry = self.registry.write().await;
        let id = registry
            .create_proposal(title, description, funding_pool, creator)?
            .id
            .clone();
        let detail = registry.proposal_detail(&id)?;
        self.metrics.proposals_created.inc();
        self.metrics.proposal_count.set(registry.proposal_count() as i64);
        info!(proposal = %id, pool = %funding_pool, "proposal created");
        Ok(detail)
    }

    pub async fn list_proposals(&self) -> Vec<ProposalSummary> {
        self.registry.read().await.list_proposals()
    }

    pub async fn proposal_detail(&self, id: &ProposalId) -> Result<ProposalDetail, NodeError> {
        Ok(self.registry.read().await.proposal_detail(id)?)
    }

    // ── Allocation ──────────────────────────────────────────────────────

    /// Set `voter_id`'s votes on `proposal_id`. The write lock covers the whole
    /// read-check-write, so concurrent calls for one voter cannot overspend.
    pub async fn allocate(
        &self,
        voter_id: &VoterId,
        proposal_id: &ProposalId,
        votes: Votes,
    ) -> Result<AllocationReceipt, NodeError> {
        let voter_id = self.require_whitelisted_voter(voter_id).await?;

        let result = self
            .registry
            .write()
            .await
            .allocate(&voter_id, proposal_id, votes);
        match &result {
            Ok(receipt) => {
                self.metrics.allocations_accepted.inc();
                info!(
                    voter = %voter_id,
                    proposal = %proposal_id,
                    votes,
                    remaining = receipt.credits_remaining,
                    "allocation set"
                );
            }
            Err(LedgerError::InsufficientCredits { .. }) => {
                self.metrics.allocations_rejected.inc();
            }
            Err(_) => {}
        }
        Ok(result?)
    }

    // ── Distribution ────────────────────────────────────────────────────

    /// Pay out a proposal's pool: fee to the treasury, the rest to `recipient`.
    ///
    /// The registry lock is released while transfers are awaited. Any failure
    /// leaves the proposal `Active` with nothing recorded, so a retry issues
    /// both transfers again, including a fee that already went through.
    pub async fn distribute(
        &self,
        caller: &str,
        proposal_id: &ProposalId,
        recipient: &str,
    ) -> Result<DistributionOutcome, NodeError> {
        self.require_whitelisted(caller).await?;
        let recipient = Address::new(recipient)
            .map_err(|_| NodeError::InvalidInput("recipient address is required".into()))?;

        let plan = self
            .registry
            .write()
            .await
            .begin_distribution(proposal_id, self.fee_bps)?;
        let pending = match plan {
            DistributionPlan::NothingToDistribute => {
                info!(proposal = %proposal_id, "funding pool is zero, nothing distributed");
                return Ok(DistributionOutcome::NothingToDistribute {
                    proposal_id: proposal_id.clone(),
                });
            }
            DistributionPlan::Transfer(pending) => pending,
        };
        let mut reservation = Reservation::new(&self.registry, proposal_id);

        let started = Instant::now();
        let result = self.run_transfers(&pending, &recipient).await;
        if let Ok((_, payout_tx)) = &result {
            reservation.payout_tx = Some(payout_tx.clone());
        }

        let mut registry = self.registry.write().await;
        reservation.settle(&mut registry)?;
        match result {
            Ok((fee_tx, payout_tx)) => {
                self.metrics.distributions_completed.inc();
                let elapsed = started.elapsed();
                self.metrics
                    .distribution_seconds
                    .observe(elapsed.as_secs_f64());
                info!(
                    proposal = %proposal_id,
                    recipient = %recipient,
                    fee = %pending.split.fee,
                    payout = %pending.split.payout,
                    payout_tx = %payout_tx,
                    elapsed = %format_duration(elapsed),
                    "proposal distributed"
                );
                Ok(DistributionOutcome::Distributed {
                    proposal_id: proposal_id.clone(),
                    recipient,
                    split: pending.split,
                    fee_tx,
                    payout_tx,
                })
            }
            Err(e) => {
                self.metrics.transfer_failures.inc();
                warn!(proposal = %proposal_id, error = %e, "distribution failed");
                Err(e)
            }
        }
    }

    async fn run_transfers(
        &self,
        pending: &PendingDistribution,
        recipient: &Address,
    ) -> Result<(Option<TxRef>, TxRef), NodeError> {
        let fee_tx = if pending.needs_fee_transfer() {
            let tx = self
                .payments
                .transfer(&self.treasury, pending.split.fee)
                .await
                .map_err(|source| NodeError::Transfer {
                    leg: TransferLeg::Fee,
                    source,
                })?;
            debug!(proposal = %pending.proposal_id, fee_tx = %tx, "fee transferred");
            Some(tx)
        } else {
            None
        };

        let payout_tx = self
            .payments
            .transfer(recipient, pending.split.payout)
            .await
            .map_err(|source| {
                if let Some(fee_tx) = &fee_tx {
                    warn!(
                        proposal = %pending.proposal_id,
                        fee_tx = %fee_tx,
                        "payout failed after the fee was paid; the fee is not refunded"
                    );
                }
                NodeError::Transfer {
                    leg: TransferLeg::Payout,
                    source,
                }
            })?;
        Ok((fee_tx, payout_tx))
    }

    // ── Health ──────────────────────────────────────────────────────────

    pub async fn health(&self) -> HealthReport {
        let registry = self.registry.read().await;
        HealthReport {
            voters: registry.voter_count(),
            proposals: registry.proposal_count(),
            started_at: self.started_at,
            uptime_secs: self.started_at.elapsed_since(self.clock.now()),
            whitelist_enabled: self.whitelist.is_enabled(),
        }
    }

    /// Gate: the address must parse and be on the allow-list.
    async fn require_whitelisted(&self, raw: &str) -> Result<Address, NodeError> {
        let address = Address::new(raw)?;
        if self.whitelist.is_allowed(&address).await {
            Ok(address)
        } else {
            self.metrics.whitelist_denials.inc();
            debug!(address = %address, "rejected by whitelist");
            Err(NodeError::Forbidden(address.to_string()))
        }
    }

    async fn require_whitelisted_voter(&self, raw: &VoterId) -> Result<VoterId, NodeError> {
        let address = self.require_whitelisted(raw.as_str()).await?;
        Ok(VoterId::new(address.normalized()))
    }
}

/// Registry key for a voter id: trimmed and lowercased.
fn voter_key(raw: &VoterId) -> Result<VoterId, NodeError> {
    Ok(VoterId::new(Address::new(raw.as_str())?.normalized()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadfund_ledger::ProposalStatus;
    use quadfund_nullables::{NullClock, NullPaymentGateway, NullWhitelistSource};
    use std::sync::Arc;
    use std::time::Duration;

    type TestNode = QuadfundNode<NullWhitelistSource, NullPaymentGateway>;

    const TREASURY: &str = "0xTreasury";

    fn config() -> NodeConfig {
        NodeConfig {
            treasury_address: TREASURY.into(),
            ..Default::default()
        }
    }

    fn node_with(members: &[&str]) -> TestNode {
        let whitelist = Whitelist::with_clock(
            NullWhitelistSource::new(members.iter().copied()),
            Arc::new(NullClock::default()),
            300,
        );
        QuadfundNode::new(&config(), whitelist, NullPaymentGateway::new()).unwrap()
    }

    fn open_node() -> TestNode {
        QuadfundNode::new(
            &config(),
            Whitelist::disabled(NullWhitelistSource::default()),
            NullPaymentGateway::new(),
        )
        .unwrap()
    }

    async fn proposal(node: &TestNode, pool: &str) -> ProposalId {
        node.create_proposal("0xcreator", "Community garden", None, pool.parse().unwrap())
            .await
            .unwrap()
            .summary
            .id
    }

    #[test]
    fn rejects_missing_treasury() {
        let result = QuadfundNode::new(
            &NodeConfig::default(),
            Whitelist::disabled(NullWhitelistSource::default()),
            NullPaymentGateway::new(),
        );
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[tokio::test]
    async fn whitelist_gates_writes_but_not_reads() {
        let node = node_with(&["0xAlice"]);
        node.register_voter("0xalice".into(), None).await.unwrap();

        let err = node.register_voter("0xmallory".into(), None).await.unwrap_err();
        assert!(matches!(err, NodeError::Forbidden(_)));
        assert_eq!(node.metrics().whitelist_denials.get(), 1);

        let err = node
            .create_proposal("0xmallory", "Spam", None, Amount::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::Forbidden(_)));

        // Reads are open to anyone.
        assert!(node.voter_status(&"0xalice".into()).await.is_ok());
        assert!(node.list_proposals().await.is_empty());
    }

    #[tokio::test]
    async fn allocation_set_adjust_and_reject() {
        let node = open_node();
        node.register_voter("0xv".into(), Some(100)).await.unwrap();
        let p = proposal(&node, "0").await;

        let r = node.allocate(&"0xv".into(), &p, 5).await.unwrap();
        assert_eq!((r.credits_cost, r.credits_remaining), (25, 75));
        let r = node.allocate(&"0xv".into(), &p, 3).await.unwrap();
        assert_eq!((r.credits_cost, r.credits_remaining), (9, 91));

        node.register_voter("0xpoor".into(), Some(10)).await.unwrap();
        let err = node.allocate(&"0xpoor".into(), &p, 4).await.unwrap_err();
        assert!(matches!(
            err,
            NodeError::Ledger(LedgerError::InsufficientCredits {
                available: 10,
                required: 16
            })
        ));
        assert_eq!(node.metrics().allocations_accepted.get(), 2);
        assert_eq!(node.metrics().allocations_rejected.get(), 1);
    }

    #[tokio::test]
    async fn concurrent_allocations_never_overspend() {
        let node = Arc::new(open_node());
        node.register_voter("0xv".into(), Some(50)).await.unwrap();
        let mut proposals = Vec::new();
        for _ in 0..8 {
            proposals.push(proposal(&node, "0").await);
        }

        let mut handles = Vec::new();
        for p in proposals {
            let node = node.clone();
            handles.push(tokio::spawn(async move {
                node.allocate(&"0xv".into(), &p, 4).await
            }));
        }
        let mut accepted = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                accepted += 1;
            }
        }
        // 16 credits each: only three fit in 50.
        assert_eq!(accepted, 3);
        let status = node.voter_status(&"0xv".into()).await.unwrap();
        assert_eq!(status.credits_used, 48);
    }

    #[tokio::test]
    async fn zero_pool_distribution_keeps_proposal_active() {
        let node = open_node();
        let p = proposal(&node, "0").await;
        let outcome = node.distribute("0xcaller", &p, "0xrecipient").await.unwrap();
        assert_eq!(
            outcome,
            DistributionOutcome::NothingToDistribute {
                proposal_id: p.clone()
            }
        );
        assert!(node.payments().transfers().is_empty());
        let detail = node.proposal_detail(&p).await.unwrap();
        assert_eq!(detail.summary.status, ProposalStatus::Active);
    }

    #[tokio::test]
    async fn distribution_pays_fee_then_payout() {
        let node = open_node();
        let p = proposal(&node, "1.0").await;
        let outcome = node.distribute("0xcaller", &p, "0xrecipient").await.unwrap();

        let DistributionOutcome::Distributed { split, fee_tx, payout_tx, .. } = outcome else {
            panic!("expected a distribution");
        };
        assert_eq!(split.fee.to_string(), "0.05");
        assert_eq!(split.payout.to_string(), "0.95");
        assert_eq!(split.fee.checked_add(split.payout), Some(split.pool));

        let transfers = node.payments().transfers();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].to.as_str(), TREASURY);
        assert_eq!(transfers[0].amount, split.fee);
        assert_eq!(transfers[1].to.as_str(), "0xrecipient");
        assert_eq!(transfers[1].amount, split.payout);
        assert_eq!(fee_tx, transfers[0].tx);
        assert_eq!(Some(payout_tx.clone()), transfers[1].tx);

        let detail = node.proposal_detail(&p).await.unwrap();
        assert_eq!(detail.summary.status, ProposalStatus::Distributed);
        assert_eq!(detail.summary.distribution_tx, Some(payout_tx));

        // Settled proposals take no more votes and cannot be paid twice.
        node.register_voter("0xv".into(), None).await.unwrap();
        assert!(matches!(
            node.allocate(&"0xv".into(), &p, 1).await,
            Err(NodeError::Ledger(LedgerError::ProposalNotActive(_)))
        ));
        assert!(matches!(
            node.distribute("0xcaller", &p, "0xrecipient").await,
            Err(NodeError::Ledger(LedgerError::ProposalNotActive(_)))
        ));
    }

    #[tokio::test]
    async fn fee_failure_leaves_proposal_untouched() {
        let node = open_node();
        let p = proposal(&node, "2").await;
        node.payments().fail_call(0);

        let err = node.distribute("0xcaller", &p, "0xr").await.unwrap_err();
        assert!(matches!(err, NodeError::Transfer { leg: TransferLeg::Fee, .. }));
        let detail = node.proposal_detail(&p).await.unwrap();
        assert_eq!(detail.summary.status, ProposalStatus::Active);
        assert_eq!(detail.summary.distribution_tx, None);
        assert_eq!(node.payments().transfers().len(), 1);
    }

    #[tokio::test]
    async fn payout_failure_then_retry_reissues_both_transfers() {
        let node = open_node();
        let p = proposal(&node, "2").await;
        node.payments().fail_call(1);

        let err = node.distribute("0xcaller", &p, "0xr").await.unwrap_err();
        assert!(matches!(err, NodeError::Transfer { leg: TransferLeg::Payout, .. }));
        let detail = node.proposal_detail(&p).await.unwrap();
        assert_eq!(detail.summary.status, ProposalStatus::Active);

        node.distribute("0xcaller", &p, "0xr").await.unwrap();
        let transfers = node.payments().transfers();
        assert_eq!(transfers.len(), 4);
        assert_eq!(transfers[2].to.as_str(), TREASURY);
        assert_eq!(transfers[3].to.as_str(), "0xr");
        // The first fee is not refunded, so the treasury is paid twice.
        let confirmed = node.payments().confirmed();
        let fees = confirmed.iter().filter(|t| t.to.as_str() == TREASURY).count();
        assert_eq!(fees, 2);
        assert_eq!(node.metrics().transfer_failures.get(), 1);
    }

    #[tokio::test]
    async fn abandoned_distribution_releases_the_proposal() {
        let node = open_node();
        let p = proposal(&node, "1").await;
        node.payments().set_delay(Duration::from_millis(200));

        let cancelled = tokio::time::timeout(
            Duration::from_millis(50),
            node.distribute("0xcaller", &p, "0xr"),
        )
        .await;
        assert!(cancelled.is_err());
        assert!(node.payments().transfers().is_empty());

        node.payments().set_delay(Duration::ZERO);
        let outcome = node.distribute("0xcaller", &p, "0xr").await.unwrap();
        assert!(matches!(outcome, DistributionOutcome::Distributed { .. }));
        let detail = node.proposal_detail(&p).await.unwrap();
        assert_eq!(detail.summary.status, ProposalStatus::Distributed);
    }

    #[tokio::test]
    async fn reservation_dropped_under_contention_is_released_later() {
        let node = open_node();
        let p = proposal(&node, "1").await;
        let registry = Arc::clone(&node.registry);
        registry.write().await.begin_distribution(&p, 500).unwrap();

        let held = registry.write().await;
        drop(Reservation::new(&registry, &p));
        assert!(held.is_distributing(&p));
        drop(held);

        for _ in 0..10 {
            if !registry.read().await.is_distributing(&p) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!registry.read().await.is_distributing(&p));
    }

    #[tokio::test]
    async fn voter_ids_are_keyed_by_normalized_address() {
        let node = node_with(&["0xalice"]);
        node.register_voter("0xalice".into(), Some(30)).await.unwrap();

        for variant in ["0xALICE", " 0xalice "] {
            let err = node.register_voter(variant.into(), None).await.unwrap_err();
            assert!(matches!(err, NodeError::Ledger(LedgerError::VoterExists(_))));
        }
        assert_eq!(node.health().await.voters, 1);

        let p = node
            .create_proposal("0xALICE", "Benches", None, Amount::ZERO)
            .await
            .unwrap()
            .summary
            .id;
        node.allocate(&"0xALICE".into(), &p, 5).await.unwrap();
        let status = node.voter_status(&" 0xAlice".into()).await.unwrap();
        assert_eq!(status.credits_used, 25);
        assert_eq!(status.voter_id.as_str(), "0xalice");
    }

    #[tokio::test]
    async fn concurrent_distribution_is_rejected() {
        let node = Arc::new(open_node());
        let p = proposal(&node, "5").await;
        node.payments().set_delay(Duration::from_millis(100));

        let first = {
            let node = node.clone();
            let p = p.clone();
            tokio::spawn(async move { node.distribute("0xcaller", &p, "0xr").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = node.distribute("0xcaller", &p, "0xr").await;
        assert!(matches!(
            second,
            Err(NodeError::Ledger(LedgerError::DistributionInProgress(_)))
        ));
        assert!(first.await.unwrap().is_ok());
        assert_eq!(node.payments().transfers().len(), 2);
    }

    #[tokio::test]
    async fn empty_recipient_is_invalid() {
        let node = open_node();
        let p = proposal(&node, "1").await;
        assert!(matches!(
            node.distribute("0xcaller", &p, "  ").await,
            Err(NodeError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn health_counts() {
        let node = open_node();
        node.register_voter("0xa".into(), None).await.unwrap();
        proposal(&node, "0").await;
        let health = node.health().await;
        assert_eq!((health.voters, health.proposals), (1, 1));
        assert!(!health.whitelist_enabled);
    }

    #[tokio::test]
    async fn uptime_follows_the_injected_clock() {
        let clock = Arc::new(NullClock::new(1_000));
        let node = QuadfundNode::with_clock(
            &config(),
            Whitelist::disabled(NullWhitelistSource::default()),
            NullPaymentGateway::new(),
            clock.clone(),
        )
        .unwrap();
        assert_eq!(node.health().await.uptime_secs, 0);

        clock.advance(90);
        let health = node.health().await;
        assert_eq!(health.started_at, Timestamp::new(1_000));
        assert_eq!(health.uptime_secs, 90);
    }
}
