//! Prometheus metrics for the quadfund node.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`] that the HTTP `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub voters_registered: IntCounter,
    pub proposals_created: IntCounter,
    /// Allocations admitted by the credit check.
    pub allocations_accepted: IntCounter,
    /// Allocations refused for lack of credits.
    pub allocations_rejected: IntCounter,
    pub distributions_completed: IntCounter,
    /// Fee or payout transfers that failed.
    pub transfer_failures: IntCounter,
    /// Gated calls refused by the whitelist.
    pub whitelist_denials: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub voter_count: IntGauge,
    pub proposal_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Wall-clock time of a full distribution (both transfers), in seconds.
    pub distribution_seconds: Histogram,
}

impl NodeMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let voters_registered = register_int_counter_with_registry!(
            Opts::new("quadfund_voters_registered_total", "Voters registered"),
            registry
        )
        .expect("failed to register voters_registered counter");

        let proposals_created = register_int_counter_with_registry!(
            Opts::new("quadfund_proposals_created_total", "Proposals created"),
            registry
        )
        .expect("failed to register proposals_created counter");

        let allocations_accepted = register_int_counter_with_registry!(
            Opts::new(
                "quadfund_allocations_accepted_total",
                "Allocations admitted by the credit check"
            ),
            registry
        )
        .expect("failed to register allocations_accepted counter");

        let allocations_rejected = register_int_counter_with_registry!(
            Opts::new(
                "quadfund_allocations_rejected_total",
                "Allocations refused for insufficient credits"
            ),
            registry
        )
        .expect("failed to register allocations_rejected counter");

        let distributions_completed = register_int_counter_with_registry!(
            Opts::new(
                "quadfund_distributions_completed_total",
                "Proposals whose funding pool was paid out"
            ),
            registry
        )
        .expect("failed to register distributions_completed counter");

        let transfer_failures = register_int_counter_with_registry!(
            Opts::new(
                "quadfund_transfer_failures_total",
                "Fee or payout transfers that failed"
            ),
            registry
        )
        .expect("failed to register transfer_failures counter");

        let whitelist_denials = register_int_counter_with_registry!(
            Opts::new(
                "quadfund_whitelist_denials_total",
                "Calls refused because the caller is not whitelisted"
            ),
            registry
        )
        .expect("failed to register whitelist_denials counter");

        let voter_count = register_int_gauge_with_registry!(
            Opts::new("quadfund_voter_count", "Registered voters"),
            registry
        )
        .expect("failed to register voter_count gauge");

        let proposal_count = register_int_gauge_with_registry!(
            Opts::new("quadfund_proposal_count", "Created proposals"),
            registry
        )
        .expect("failed to register proposal_count gauge");

        // Transfers wait for confirmation, so buckets run from 0.1 s to ~27 min.
        let distribution_seconds = register_histogram_with_registry!(
            HistogramOpts::new(
                "quadfund_distribution_seconds",
                "Time to complete both distribution transfers"
            )
            .buckets(prometheus::exponential_buckets(0.1, 2.0, 15).unwrap_or_default()),
            registry
        )
        .expect("failed to register distribution_seconds histogram");

        Self {
            registry,
            voters_registered,
            proposals_created,
            allocations_accepted,
            allocations_rejected,
            distributions_completed,
            transfer_failures,
            whitelist_denials,
            voter_count,
            proposal_count,
            distribution_seconds,
        }
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            tracing::warn!(error = %e, "failed to encode metrics");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_contains_registered_metrics() {
        let metrics = NodeMetrics::new();
        metrics.allocations_accepted.inc();
        metrics.voter_count.set(3);
        let text = metrics.encode();
        assert!(text.contains("quadfund_allocations_accepted_total 1"));
        assert!(text.contains("quadfund_voter_count 3"));
    }

    #[test]
    fn separate_instances_do_not_collide() {
        let a = NodeMetrics::new();
        let b = NodeMetrics::new();
        a.whitelist_denials.inc();
        assert_eq!(b.whitelist_denials.get(), 0);
    }
}
