/* Network boundary used by generated bindings
 *
 * Bindings never talk to a node directly. Readonly endpoints go through
 * `query`, mutable endpoints through `call`, which must only return once the
 * transaction is final or has failed. Signing, nonce management and HTTP live
 * in the implementation.
 */

use crate::errors::{BindingError, TransportError};
use num_bigint::BigUint;

pub trait NetworkTransport {
    /// Runs a readonly query and returns the raw return slots.
    fn query(
        &self,
        contract_address: &str,
        endpoint: &str,
        args: &[String],
    ) -> Result<Vec<Vec<u8>>, TransportError>;

    /// Submits a transaction and waits for it to be final.
    fn call(&self, request: CallRequest<'_>) -> Result<CallOutcome, TransportError>;
}

impl<T: NetworkTransport + ?Sized> NetworkTransport for &T {
    fn query(
        &self,
        contract_address: &str,
        endpoint: &str,
        args: &[String],
    ) -> Result<Vec<Vec<u8>>, TransportError> {
        (**self).query(contract_address, endpoint, args)
    }

    fn call(&self, request: CallRequest<'_>) -> Result<CallOutcome, TransportError> {
        (**self).call(request)
    }
}

/// Value and gas settings of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallOptions {
    /// EGLD value attached to the call, in denomination units.
    pub value: BigUint,
    pub gas_limit: u64,
    /// Explicit account nonce, or `None` to let the transport pick one.
    pub nonce: Option<u64>,
}

impl CallOptions {
    pub fn with_gas_limit(gas_limit: u64) -> Self {
        Self { gas_limit, ..Self::default() }
    }
}

/// A fungible or semi-fungible token transferred with a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayment {
    pub token_identifier: String,
    pub nonce: u64,
    pub amount: BigUint,
}

#[derive(Debug, Clone)]
pub struct CallRequest<'a> {
    pub contract_address: &'a str,
    pub endpoint: &'a str,
    pub args: Vec<String>,
    pub options: &'a CallOptions,
    pub payment: Option<&'a TokenPayment>,
}

impl CallRequest<'_> {
    /// `endpoint@arg1@arg2...`, the transaction data of a plain call.
    pub fn data_field(&self) -> String {
        let mut data = self.endpoint.to_string();
        for arg in &self.args {
            data.push('@');
            data.push_str(arg);
        }
        data
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStatus {
    Success,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub tx_hash: String,
    pub status: CallStatus,
}

impl CallOutcome {
    /// The transaction hash of a successful call, `CallFailed` otherwise.
    pub fn into_result(self, endpoint: &str) -> Result<String, BindingError> {
        match self.status {
            CallStatus::Success => Ok(self.tx_hash),
            CallStatus::Failed { reason } => Err(BindingError::CallFailed {
                endpoint: endpoint.to_string(),
                tx_hash: self.tx_hash,
                reason,
            }),
        }
    }
}
