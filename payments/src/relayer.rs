//! HTTP relayer client.
//!
//! Contract with the relayer:
//! - `POST {url}/transfers` with `{"to", "amount", "amountRaw"}` submits a
//!   transfer and answers `{"txHash": "..."}`.
//! - `GET {url}/transfers/{txHash}` answers `{"status": "pending" | "confirmed"
//!   | "failed", "reason"?}`.
//!
//! [`HttpPaymentGateway::transfer`] submits, then polls until the transfer
//! leaves `pending`.

use quadfund_types::{Address, Amount, TxRef};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::PaymentError;
use crate::gateway::PaymentGateway;

/// Default timeout for a single relayer request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default delay between confirmation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct HttpPaymentGateway {
    http_client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferRequest<'a> {
    to: &'a str,
    amount: String,
    amount_raw: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferSubmitted {
    tx_hash: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum TransferState {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Deserialize)]
struct TransferStatus {
    status: TransferState,
    #[serde(default)]
    reason: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_settings(base_url, DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_settings(
        base_url: impl Into<String>,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval,
        }
    }

    async fn submit(&self, to: &Address, amount: Amount) -> Result<String, PaymentError> {
        let url = format!("{}/transfers", self.base_url);
        let body = TransferRequest {
            to: to.as_str(),
            amount: amount.to_string(),
            amount_raw: amount.raw().to_string(),
        };
        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(PaymentError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }
        let submitted: TransferSubmitted = response.json().await.map_err(|e| {
            PaymentError::InvalidResponse(format!("failed to parse submit response: {e}"))
        })?;
        Ok(submitted.tx_hash)
    }

    async fn poll(&self, tx_hash: &str) -> Result<TransferStatus, PaymentError> {
        let url = format!("{}/transfers/{}", self.base_url, tx_hash);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(map_send_error)?;
        if !response.status().is_success() {
            return Err(PaymentError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }
        response.json().await.map_err(|e| {
            PaymentError::InvalidResponse(format!("failed to parse status response: {e}"))
        })
    }
}

impl PaymentGateway for HttpPaymentGateway {
    async fn transfer(&self, to: &Address, amount: Amount) -> Result<TxRef, PaymentError> {
        let tx_hash = self.submit(to, amount).await?;
        info!(to = %to, amount = %amount, tx = %tx_hash, "transfer submitted");

        loop {
            let status = self.poll(&tx_hash).await?;
            match status.status {
                TransferState::Confirmed => {
                    info!(tx = %tx_hash, "transfer confirmed");
                    return Ok(TxRef::new(tx_hash));
                }
                TransferState::Failed => {
                    return Err(PaymentError::Rejected {
                        tx: tx_hash,
                        reason: status.reason.unwrap_or_else(|| "unspecified".into()),
                    });
                }
                TransferState::Pending => {
                    debug!(tx = %tx_hash, "transfer pending");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

fn map_send_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::Unreachable(format!("request timed out: {e}"))
    } else if e.is_connect() {
        PaymentError::Unreachable(format!("connection failed: {e}"))
    } else {
        PaymentError::RequestFailed(e.to_string())
    }
}
