//! The transfer capability, abstracted for testing.

use quadfund_types::{Address, Amount, TxRef};
use std::future::Future;

use crate::error::PaymentError;

pub trait PaymentGateway: Send + Sync + 'static {
    /// Send `amount` to `to`. Resolves once the transfer is confirmed.
    fn transfer(
        &self,
        to: &Address,
        amount: Amount,
    ) -> impl Future<Output = Result<TxRef, PaymentError>> + Send;
}
