//! # Wallet Signer Capability
//!
//! The external signer: pairs with a wallet to obtain the caller
//! identity, and signs-and-submits constructed operations. The client
//! never holds key material — signing is entirely delegated, and a
//! rejection by the wallet's user is an ordinary failure mode, not an
//! exceptional one.
//!
//! [`HttpWalletSigner`] speaks to a wallet relay over HTTP. The trait
//! methods are synchronous; the HTTP implementation blocks on the
//! ambient Tokio runtime, so async callers should wrap calls in
//! `tokio::task::spawn_blocking`.

use std::time::Duration;

use vcreg_core::{AccountAddress, OperationHash};

use crate::calls::OperationPayload;

/// Errors from the signer capability.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// The wallet's user declined pairing or the operation.
    #[error("rejected by signer: {reason}")]
    Rejected {
        /// Wallet-reported reason, verbatim.
        reason: String,
    },

    /// The wallet is paired against a different network than the session
    /// targets.
    #[error("network mismatch: session targets {requested}, signer is on {actual}")]
    NetworkMismatch {
        /// Network the session was configured for.
        requested: String,
        /// Network the wallet reported.
        actual: String,
    },

    /// The wallet relay is unreachable or returned a malformed response.
    #[error("signer unavailable: {reason}")]
    Unavailable {
        /// Transport-level cause, verbatim.
        reason: String,
    },
}

/// Capability trait for the external wallet signer.
///
/// Implementations must be `Send + Sync` so a handle can be captured by
/// concurrent in-flight calls behind an `Arc`.
pub trait Signer: Send + Sync {
    /// Run the pairing flow against `network` and return the paired
    /// account. Re-invocation re-runs pairing; implementations must not
    /// dedup.
    fn pair(&self, network: &str) -> Result<AccountAddress, SignerError>;

    /// Sign the operation and inject it into the network, returning the
    /// operation hash. Must not retry internally: a second injection of
    /// a signed operation is a second operation.
    fn sign_and_submit(&self, payload: &OperationPayload) -> Result<OperationHash, SignerError>;
}

/// Configuration for the wallet-relay HTTP signer.
#[derive(Debug, Clone)]
pub struct WalletSignerConfig {
    /// Base URL of the wallet relay.
    pub base_url: String,
    /// Application name announced during pairing.
    pub app_name: String,
    /// Request timeout in seconds (default: 30). Pairing waits on a
    /// human; keep this generous.
    pub timeout_secs: u64,
}

impl WalletSignerConfig {
    /// Create a new configuration with default timeout.
    pub fn new(base_url: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            app_name: app_name.into(),
            timeout_secs: 30,
        }
    }
}

/// HTTP client for a wallet relay implementing pairing and
/// sign-and-submit.
#[derive(Debug)]
pub struct HttpWalletSigner {
    client: reqwest::Client,
    base_url: String,
    app_name: String,
}

#[derive(serde::Deserialize)]
struct PairResponse {
    address: AccountAddress,
    #[serde(default)]
    network: Option<String>,
}

#[derive(serde::Deserialize)]
struct SubmitResponse {
    hash: String,
}

impl HttpWalletSigner {
    /// Create a new wallet signer from configuration.
    pub fn new(config: WalletSignerConfig) -> Result<Self, SignerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SignerError::Unavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            app_name: config.app_name,
        })
    }

    fn runtime(&self) -> Result<tokio::runtime::Handle, SignerError> {
        tokio::runtime::Handle::try_current().map_err(|_| SignerError::Unavailable {
            reason: "no async runtime available for HTTP request".into(),
        })
    }
}

impl Signer for HttpWalletSigner {
    fn pair(&self, network: &str) -> Result<AccountAddress, SignerError> {
        let rt = self.runtime()?;
        let url = format!("{}/pair", self.base_url);
        let body = serde_json::json!({
            "app_name": self.app_name,
            "network": network,
        });

        rt.block_on(async {
            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| SignerError::Unavailable {
                    reason: format!("pair: {e}"),
                })?;

            if resp.status().is_client_error() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(SignerError::Rejected {
                    reason: format!("HTTP {status}: {text}"),
                });
            }
            if !resp.status().is_success() {
                return Err(SignerError::Unavailable {
                    reason: format!("pair: HTTP {}", resp.status()),
                });
            }

            let paired: PairResponse =
                resp.json().await.map_err(|e| SignerError::Unavailable {
                    reason: format!("pair: response deserialization failed: {e}"),
                })?;

            if let Some(actual) = paired.network {
                if actual != network {
                    return Err(SignerError::NetworkMismatch {
                        requested: network.to_string(),
                        actual,
                    });
                }
            }

            tracing::info!(address = %paired.address, network, "wallet paired");
            Ok(paired.address)
        })
    }

    fn sign_and_submit(&self, payload: &OperationPayload) -> Result<OperationHash, SignerError> {
        let rt = self.runtime()?;
        let url = format!("{}/operations", self.base_url);

        rt.block_on(async {
            let resp = self
                .client
                .post(&url)
                .json(payload)
                .send()
                .await
                .map_err(|e| SignerError::Unavailable {
                    reason: format!("sign_and_submit: {e}"),
                })?;

            if resp.status().is_client_error() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(SignerError::Rejected {
                    reason: format!("HTTP {status}: {text}"),
                });
            }
            if !resp.status().is_success() {
                return Err(SignerError::Unavailable {
                    reason: format!("sign_and_submit: HTTP {}", resp.status()),
                });
            }

            let submitted: SubmitResponse =
                resp.json().await.map_err(|e| SignerError::Unavailable {
                    reason: format!("sign_and_submit: response deserialization failed: {e}"),
                })?;

            Ok(OperationHash::new(submitted.hash))
        })
    }
}
