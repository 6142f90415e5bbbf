//! Nullable payment gateway: record transfers without sending them.

use quadfund_payments::{PaymentError, PaymentGateway};
use quadfund_types::{Address, Amount, TxRef};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// A transfer the gateway was asked to make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub to: Address,
    pub amount: Amount,
    pub tx: Option<TxRef>,
}

/// Confirms every transfer instantly unless told otherwise.
///
/// Calls are numbered from 0 in arrival order; [`NullPaymentGateway::fail_call`]
/// makes a specific call fail. Failed calls are recorded with `tx: None`.
pub struct NullPaymentGateway {
    transfers: Mutex<Vec<RecordedTransfer>>,
    failing_calls: Mutex<HashSet<usize>>,
    delay: Mutex<Option<Duration>>,
}

impl NullPaymentGateway {
    pub fn new() -> Self {
        Self {
            transfers: Mutex::new(Vec::new()),
            failing_calls: Mutex::new(HashSet::new()),
            delay: Mutex::new(None),
        }
    }

    /// Make the `n`th call (0-based) fail.
    pub fn fail_call(&self, n: usize) {
        self.failing_calls.lock().unwrap().insert(n);
    }

    /// Wait this long before confirming each transfer.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Everything the gateway has been asked to do (for assertions).
    pub fn transfers(&self) -> Vec<RecordedTransfer> {
        self.transfers.lock().unwrap().clone()
    }

    /// Only the transfers that were confirmed.
    pub fn confirmed(&self) -> Vec<RecordedTransfer> {
        self.transfers()
            .into_iter()
            .filter(|t| t.tx.is_some())
            .collect()
    }
}

impl PaymentGateway for NullPaymentGateway {
    async fn transfer(&self, to: &Address, amount: Amount) -> Result<TxRef, PaymentError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut transfers = self.transfers.lock().unwrap();
        let n = transfers.len();
        let fail = self.failing_calls.lock().unwrap().contains(&n);
        let tx = (!fail).then(|| TxRef::new(format!("0xnull{n}")));
        transfers.push(RecordedTransfer {
            to: to.clone(),
            amount,
            tx: tx.clone(),
        });
        drop(transfers);

        tx.ok_or_else(|| PaymentError::Rejected {
            tx: format!("0xnull{n}"),
            reason: "null gateway set to fail".into(),
        })
    }
}

impl Default for NullPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}
