//! RPC request handlers and their JSON shapes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use quadfund_ledger::{
    AllocationLine, AllocationReceipt, ContributorLine, ProposalDetail, ProposalStatus,
    ProposalSummary, VoterStatus,
};
use quadfund_node::{DistributionOutcome, QuadfundNode};
use quadfund_payments::PaymentGateway;
use quadfund_types::{Amount, Credits, ProposalId, TxRef, VoterId, Votes};
use quadfund_whitelist::WhitelistSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::RpcError;

pub type NodeState<W, P> = State<Arc<QuadfundNode<W, P>>>;
type Body<T> = Result<Json<T>, JsonRejection>;

// ── Voters ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVoterRequest {
    pub voter_id: String,
    /// Signed so a negative figure reaches validation instead of the decoder.
    pub credits: Option<i128>,
}

#[derive(Deserialize)]
pub struct AddCreditsRequest {
    pub amount: Option<i128>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    pub proposal_id: ProposalId,
    pub votes: Votes,
    pub credits_cost: Credits,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterResponse {
    pub voter_id: VoterId,
    pub credits: Credits,
    pub credits_used: Credits,
    pub credits_remaining: Credits,
    pub allocations: Vec<AllocationEntry>,
}

impl From<VoterStatus> for VoterResponse {
    fn from(v: VoterStatus) -> Self {
        Self {
            voter_id: v.voter_id,
            credits: v.credits,
            credits_used: v.credits_used,
            credits_remaining: v.credits_remaining,
            allocations: v
                .allocations
                .into_iter()
                .map(|AllocationLine { proposal_id, votes, credits_cost }| AllocationEntry {
                    proposal_id,
                    votes,
                    credits_cost,
                })
                .collect(),
        }
    }
}

pub async fn register_voter<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
    body: Body<RegisterVoterRequest>,
) -> Result<Json<VoterResponse>, RpcError> {
    let Json(req) = body?;
    let credits = match req.credits {
        Some(c) => Some(non_negative(c, "credits")?),
        None => None,
    };
    let status = node.register_voter(VoterId::new(req.voter_id), credits).await?;
    Ok(Json(status.into()))
}

pub async fn get_voter<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
    Path(id): Path<String>,
) -> Result<Json<VoterResponse>, RpcError> {
    let status = node.voter_status(&VoterId::new(id)).await?;
    Ok(Json(status.into()))
}

pub async fn add_credits<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
    Path(id): Path<String>,
    body: Body<AddCreditsRequest>,
) -> Result<Json<VoterResponse>, RpcError> {
    let Json(req) = body?;
    let amount = match req.amount {
        Some(a) if a > 0 => non_negative(a, "amount")?,
        _ => {
            return Err(RpcError::InvalidRequest(
                "amount must be a positive integer".into(),
            ))
        }
    };
    let status = node.add_credits(&VoterId::new(id), amount).await?;
    Ok(Json(status.into()))
}

// ── Proposals ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    pub creator: String,
    pub title: String,
    pub description: Option<String>,
    /// Decimal string in whole units, e.g. "1.5".
    pub funding_pool: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    pub id: ProposalId,
    pub title: String,
    pub description: Option<String>,
    pub funding_pool: Amount,
    pub status: ProposalStatus,
    pub distribution_tx: Option<TxRef>,
    pub total_votes: u128,
    pub voter_count: usize,
}

impl From<ProposalSummary> for ProposalResponse {
    fn from(p: ProposalSummary) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            funding_pool: p.funding_pool,
            status: p.status,
            distribution_tx: p.distribution_tx,
            total_votes: p.total_votes,
            voter_count: p.voter_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorEntry {
    pub voter_id: VoterId,
    pub votes: Votes,
    pub credits_cost: Credits,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDetailResponse {
    #[serde(flatten)]
    pub proposal: ProposalResponse,
    pub created_by: String,
    pub contributors: Vec<ContributorEntry>,
}

impl From<ProposalDetail> for ProposalDetailResponse {
    fn from(d: ProposalDetail) -> Self {
        Self {
            proposal: d.summary.into(),
            created_by: d.created_by.to_string(),
            contributors: d
                .contributors
                .into_iter()
                .map(|ContributorLine { voter_id, votes, credits_cost }| ContributorEntry {
                    voter_id,
                    votes,
                    credits_cost,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalResponse>,
}

pub async fn create_proposal<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
    body: Body<CreateProposalRequest>,
) -> Result<Json<ProposalDetailResponse>, RpcError> {
    let Json(req) = body?;
    let funding_pool = match req.funding_pool.as_deref() {
        Some(raw) => raw.parse::<Amount>()?,
        None => Amount::ZERO,
    };
    let detail = node
        .create_proposal(&req.creator, &req.title, req.description, funding_pool)
        .await?;
    Ok(Json(detail.into()))
}

pub async fn list_proposals<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
) -> Json<ProposalListResponse> {
    let proposals = node.list_proposals().await;
    Json(ProposalListResponse {
        proposals: proposals.into_iter().map(Into::into).collect(),
    })
}

pub async fn get_proposal<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
    Path(id): Path<String>,
) -> Result<Json<ProposalDetailResponse>, RpcError> {
    let detail = node.proposal_detail(&ProposalId::new(id)).await?;
    Ok(Json(detail.into()))
}

// ── Allocation ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateRequest {
    pub voter_id: String,
    pub votes: Option<i64>,
}

pub async fn allocate<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
    Path(id): Path<String>,
    body: Body<AllocateRequest>,
) -> Result<Json<AllocationReceipt>, RpcError> {
    let Json(req) = body?;
    let votes = req
        .votes
        .and_then(|v| Votes::try_from(v).ok())
        .ok_or_else(|| RpcError::InvalidRequest("votes must be a non-negative integer".into()))?;
    let receipt = node
        .allocate(&VoterId::new(req.voter_id), &ProposalId::new(id), votes)
        .await?;
    Ok(Json(receipt))
}

// ── Distribution ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DistributeRequest {
    pub caller: String,
    pub recipient: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeResponse {
    pub proposal_id: ProposalId,
    pub distributed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_pool: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_tx: Option<TxRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_tx: Option<TxRef>,
}

impl From<DistributionOutcome> for DistributeResponse {
    fn from(outcome: DistributionOutcome) -> Self {
        match outcome {
            DistributionOutcome::NothingToDistribute { proposal_id } => Self {
                proposal_id,
                distributed: false,
                recipient: None,
                funding_pool: None,
                fee: None,
                payout: None,
                fee_tx: None,
                payout_tx: None,
            },
            DistributionOutcome::Distributed {
                proposal_id,
                recipient,
                split,
                fee_tx,
                payout_tx,
            } => Self {
                proposal_id,
                distributed: true,
                recipient: Some(recipient.to_string()),
                funding_pool: Some(split.pool),
                fee: Some(split.fee),
                payout: Some(split.payout),
                fee_tx,
                payout_tx: Some(payout_tx),
            },
        }
    }
}

pub async fn distribute<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
    Path(id): Path<String>,
    body: Body<DistributeRequest>,
) -> Result<Json<DistributeResponse>, RpcError> {
    let Json(req) = body?;
    let outcome = node
        .distribute(&req.caller, &ProposalId::new(id), &req.recipient)
        .await?;
    Ok(Json(outcome.into()))
}

// ── Health & metrics ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub voters: usize,
    pub proposals: usize,
    pub uptime_secs: u64,
    pub whitelist_enabled: bool,
}

pub async fn health<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
) -> Json<HealthResponse> {
    let report = node.health().await;
    Json(HealthResponse {
        status: "ok",
        voters: report.voters,
        proposals: report.proposals,
        uptime_secs: report.uptime_secs,
        whitelist_enabled: report.whitelist_enabled,
    })
}

pub async fn metrics<W: WhitelistSource, P: PaymentGateway>(
    State(node): NodeState<W, P>,
) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        node.metrics().encode(),
    )
}

fn non_negative(value: i128, field: &str) -> Result<Credits, RpcError> {
    Credits::try_from(value)
        .map_err(|_| RpcError::InvalidRequest(format!("{field} must not be negative")))
}
