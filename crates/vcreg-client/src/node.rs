//! # Ledger Node Capability
//!
//! The read side of the ledger: waiting for a submitted operation to
//! reach its confirmation depth, and executing the registry contract's
//! read-only views. Submission itself goes through the signer capability
//! ([`crate::signer::Signer`]) — the node never carries key material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vcreg_core::{AccountAddress, ContractAddress, OperationHash};

use crate::calls::View;

/// How long and how deep to wait for inclusion.
///
/// Fixed-depth confirmation only: the client waits until the inclusion
/// block has `depth` blocks on top of it. Canonical-finality waiting is
/// not implemented. The timeout is mandatory — confirmation waiting is
/// the one suspension point that must not be unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Blocks required on top of the inclusion block (default: 1).
    pub depth: u64,
    /// Give up after this many seconds.
    pub timeout_secs: u64,
    /// Inclusion polling cadence in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            depth: 1,
            timeout_secs: 90,
            poll_interval_ms: 2_000,
        }
    }
}

/// Receipt for an operation that reached its confirmation depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationReceipt {
    /// The operation's hash, as submitted.
    pub operation: OperationHash,
    /// Block level the operation was included at.
    pub included_at_level: u64,
    /// Blocks observed on top of the inclusion block when the receipt
    /// was taken.
    pub confirmations: u64,
    /// Inclusion block timestamp.
    pub timestamp: DateTime<Utc>,
    /// Nested per-internal-operation result payloads, verbatim. Result
    /// extractors walk this to pull out server-assigned identities.
    pub internal_results: Value,
}

/// Errors from the node capability.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// The node is unreachable or returned a malformed response.
    #[error("node unavailable: {reason}")]
    Unavailable {
        /// Transport-level cause, verbatim.
        reason: String,
    },

    /// The operation did not reach the confirmation depth within the
    /// policy's timeout, or was dropped from the mempool.
    #[error("operation {operation} unconfirmed after {waited_secs}s")]
    ConfirmationTimedOut {
        /// The operation that was being waited on.
        operation: OperationHash,
        /// Seconds waited before giving up.
        waited_secs: u64,
    },

    /// The operation was included but the ledger reports it failed at
    /// application time.
    #[error("operation {operation} failed on-chain: {reason}")]
    OperationFailed {
        /// The failed operation.
        operation: OperationHash,
        /// Ledger-reported failure, verbatim.
        reason: String,
    },

    /// A view query failed.
    #[error("view `{view}` failed: {reason}")]
    ViewFailed {
        /// The view that was queried.
        view: String,
        /// Cause, verbatim.
        reason: String,
    },
}

/// Capability trait for the ledger node.
///
/// Implementations must be `Send + Sync`; a production implementation is
/// [`crate::rpc::RpcRegistryNode`], and tests substitute in-memory fakes.
pub trait RegistryNode: Send + Sync {
    /// Block until `operation` has `policy.depth` blocks on top of its
    /// inclusion block, returning the receipt. Must respect the policy's
    /// timeout.
    fn await_confirmation(
        &self,
        operation: &OperationHash,
        policy: &ConfirmationPolicy,
    ) -> Result<OperationReceipt, NodeError>;

    /// Execute a read-only contract view. `view_caller` is the identity
    /// the view runs as — some registries gate view access by caller.
    fn run_view(
        &self,
        contract: &ContractAddress,
        view: &View,
        view_caller: &AccountAddress,
    ) -> Result<Value, NodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_one_block_with_bounded_wait() {
        let policy = ConfirmationPolicy::default();
        assert_eq!(policy.depth, 1);
        assert_eq!(policy.timeout_secs, 90);
    }

    #[test]
    fn receipt_serde_roundtrip() {
        let receipt = OperationReceipt {
            operation: OperationHash::new("ooABC"),
            included_at_level: 100,
            confirmations: 1,
            timestamp: Utc::now(),
            internal_results: serde_json::json!([{ "storage": [1] }]),
        };
        let json = serde_json::to_string(&receipt).unwrap();
        let back: OperationReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back.operation, receipt.operation);
        assert_eq!(back.included_at_level, 100);
        assert_eq!(back.internal_results, receipt.internal_results);
    }
}
