//! # Node HTTP Adapter
//!
//! [`RpcRegistryNode`] implements the [`RegistryNode`] capability against
//! a ledger node's HTTP API:
//!
//! - `GET /operations/{hash}` — inclusion lookup; `404` means not yet
//!   included (or dropped — the two are indistinguishable until timeout).
//! - `GET /head` — current head level, for confirmation arithmetic.
//! - `POST /contracts/{address}/views/{view}` — read-only view execution
//!   with an explicit `view_caller`.
//!
//! Confirmation waiting polls inclusion and compares the inclusion level
//! against the head until the policy's depth is reached, bounded by the
//! policy's timeout. Transport hiccups while polling are tolerated — the
//! clock, not the error, decides when to give up.

use std::time::{Duration, Instant};

use serde_json::Value;
use vcreg_core::{AccountAddress, ContractAddress, OperationHash};

use crate::calls::View;
use crate::config::ClientConfig;
use crate::node::{ConfirmationPolicy, NodeError, OperationReceipt, RegistryNode};
use crate::retry::retry_send;

/// HTTP implementation of the node capability.
#[derive(Debug)]
pub struct RpcRegistryNode {
    client: reqwest::Client,
    base_url: String,
}

/// Inclusion record returned by `GET /operations/{hash}`.
#[derive(Debug, serde::Deserialize)]
struct InclusionRecord {
    level: u64,
    timestamp: chrono::DateTime<chrono::Utc>,
    applied: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    internal_results: Value,
}

#[derive(Debug, serde::Deserialize)]
struct HeadRecord {
    level: u64,
}

#[derive(Debug, serde::Deserialize)]
struct ViewRecord {
    result: Value,
}

impl RpcRegistryNode {
    /// Create a node adapter for the configured endpoint.
    pub fn new(config: &ClientConfig) -> Result<Self, NodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NodeError::Unavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        let base_url = config.endpoint.as_str().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn runtime(&self) -> Result<tokio::runtime::Handle, NodeError> {
        tokio::runtime::Handle::try_current().map_err(|_| NodeError::Unavailable {
            reason: "no async runtime available for HTTP request".into(),
        })
    }

    /// One inclusion poll. `Ok(None)` means the node does not know the
    /// operation yet.
    async fn poll_inclusion(
        &self,
        operation: &OperationHash,
    ) -> Result<Option<InclusionRecord>, NodeError> {
        let url = format!("{}/operations/{}", self.base_url, operation);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NodeError::Unavailable {
                reason: format!("poll inclusion: {e}"),
            })?;

        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(NodeError::Unavailable {
                reason: format!("poll inclusion: HTTP {}", resp.status()),
            });
        }

        let record: InclusionRecord =
            resp.json().await.map_err(|e| NodeError::Unavailable {
                reason: format!("poll inclusion: response deserialization failed: {e}"),
            })?;
        Ok(Some(record))
    }

    async fn head_level(&self) -> Result<u64, NodeError> {
        let url = format!("{}/head", self.base_url);
        let resp = retry_send(|| self.client.get(&url).send())
            .await
            .map_err(|e| NodeError::Unavailable {
                reason: format!("head: {e}"),
            })?;
        if !resp.status().is_success() {
            return Err(NodeError::Unavailable {
                reason: format!("head: HTTP {}", resp.status()),
            });
        }
        let head: HeadRecord = resp.json().await.map_err(|e| NodeError::Unavailable {
            reason: format!("head: response deserialization failed: {e}"),
        })?;
        Ok(head.level)
    }

    async fn wait_for_depth(
        &self,
        operation: &OperationHash,
        policy: &ConfirmationPolicy,
    ) -> Result<OperationReceipt, NodeError> {
        let started = Instant::now();
        let deadline = Duration::from_secs(policy.timeout_secs);
        let interval = Duration::from_millis(policy.poll_interval_ms);

        loop {
            // Transport errors here do not abort the wait; the operation
            // may confirm while the node is briefly unreachable.
            match self.poll_inclusion(operation).await {
                Err(e) => {
                    tracing::warn!(operation = %operation, error = %e, "inclusion poll failed")
                }
                Ok(None) => {
                    tracing::debug!(operation = %operation, "operation not yet included")
                }
                Ok(Some(record)) => {
                    if !record.applied {
                        return Err(NodeError::OperationFailed {
                            operation: operation.clone(),
                            reason: record
                                .error
                                .unwrap_or_else(|| "application failed".to_string()),
                        });
                    }
                    let head = self.head_level().await.unwrap_or(record.level);
                    let confirmations = head.saturating_sub(record.level);
                    if confirmations >= policy.depth {
                        return Ok(OperationReceipt {
                            operation: operation.clone(),
                            included_at_level: record.level,
                            confirmations,
                            timestamp: record.timestamp,
                            internal_results: record.internal_results,
                        });
                    }
                    tracing::debug!(
                        operation = %operation,
                        confirmations,
                        required = policy.depth,
                        "included, awaiting depth"
                    );
                }
            }

            if started.elapsed() >= deadline {
                return Err(NodeError::ConfirmationTimedOut {
                    operation: operation.clone(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(interval).await;
        }
    }
}

impl RegistryNode for RpcRegistryNode {
    fn await_confirmation(
        &self,
        operation: &OperationHash,
        policy: &ConfirmationPolicy,
    ) -> Result<OperationReceipt, NodeError> {
        let rt = self.runtime()?;
        rt.block_on(self.wait_for_depth(operation, policy))
    }

    fn run_view(
        &self,
        contract: &ContractAddress,
        view: &View,
        view_caller: &AccountAddress,
    ) -> Result<Value, NodeError> {
        let rt = self.runtime()?;
        let url = format!("{}/contracts/{}/views/{}", self.base_url, contract, view.name());
        let body = serde_json::json!({
            "arguments": view.arguments(),
            "view_caller": view_caller,
        });

        rt.block_on(async {
            let resp = retry_send(|| self.client.post(&url).json(&body).send())
                .await
                .map_err(|e| NodeError::ViewFailed {
                    view: view.name().to_string(),
                    reason: e.to_string(),
                })?;

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(NodeError::ViewFailed {
                    view: view.name().to_string(),
                    reason: format!("HTTP {status}: {text}"),
                });
            }

            let record: ViewRecord = resp.json().await.map_err(|e| NodeError::ViewFailed {
                view: view.name().to_string(),
                reason: format!("response deserialization failed: {e}"),
            })?;
            Ok(record.result)
        })
    }
}
