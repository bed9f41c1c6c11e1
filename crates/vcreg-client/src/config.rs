//! Client configuration: endpoint, target registry, confirmation policy.
//!
//! Both the node endpoint and the registry contract address are
//! environment-specific and externally supplied — defaults here cover
//! only the protocol-level knobs (confirmation depth, timeout, polling
//! cadence).

use url::Url;
use vcreg_core::{ContractAddress, OperationHash, ValidationError};

/// Errors from client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The node endpoint is not a valid URL.
    #[error("invalid endpoint URL `{endpoint}`: {source}")]
    InvalidEndpoint {
        /// The raw endpoint string.
        endpoint: String,
        /// URL parse failure.
        source: url::ParseError,
    },

    /// The registry contract address is malformed.
    #[error("invalid registry address: {0}")]
    InvalidRegistryAddress(#[from] ValidationError),
}

/// Configuration for a registry client session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Node endpoint the client submits to and reads views from.
    pub endpoint: Url,
    /// Address of the registry contract.
    pub registry_address: ContractAddress,
    /// Network name checked during wallet pairing (e.g. `ghostnet`).
    pub network: String,
    /// Blocks after inclusion before an operation counts as confirmed
    /// (default: 1).
    pub confirmation_depth: u64,
    /// Upper bound on confirmation waiting — the only client-enforced
    /// timeout (default: 90s, roughly three block times).
    pub confirmation_timeout_secs: u64,
    /// Cadence for polling operation inclusion (default: 2000ms).
    pub poll_interval_ms: u64,
    /// Block-explorer base URL used to format operation links, if any.
    pub explorer_base: Option<Url>,
}

impl ClientConfig {
    /// Create a configuration with default confirmation policy.
    pub fn new(endpoint: &str, registry_address: &str) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        Ok(Self {
            endpoint,
            registry_address: ContractAddress::new(registry_address)?,
            network: "ghostnet".to_string(),
            confirmation_depth: 1,
            confirmation_timeout_secs: 90,
            poll_interval_ms: 2_000,
            explorer_base: None,
        })
    }

    /// Set the network name the signer must be paired against.
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    /// Set the confirmation depth and timeout.
    pub fn with_confirmation(mut self, depth: u64, timeout_secs: u64) -> Self {
        self.confirmation_depth = depth;
        self.confirmation_timeout_secs = timeout_secs;
        self
    }

    /// Set the inclusion polling cadence.
    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Set the block-explorer base URL for operation links.
    pub fn with_explorer(mut self, base: Url) -> Self {
        self.explorer_base = Some(base);
        self
    }

    /// Format a block-explorer link for a confirmed operation, when an
    /// explorer is configured.
    pub fn operation_url(&self, hash: &OperationHash) -> Option<Url> {
        let base = self.explorer_base.as_ref()?;
        base.join(hash.as_str()).ok()
    }
}
