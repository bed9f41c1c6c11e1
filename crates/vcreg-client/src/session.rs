//! # Session Manager
//!
//! Process-wide connection state: the target registry address and the
//! single paired signer. Modelled as an explicit, injectable object — a
//! pipeline invocation receives the session it runs against, so tests
//! and concurrent sessions need no global state.
//!
//! ## Concurrency
//!
//! The signer slot is the session's only shared mutable resource.
//! [`Session::resolve_registry`] takes an immutable snapshot
//! ([`RegistryHandle`]) under a read lock; only [`Session::connect`]
//! writes the slot, and replacing it does not disturb in-flight calls
//! that captured a prior handle.

use std::sync::Arc;

use parking_lot::RwLock;
use vcreg_core::{AccountAddress, ContractAddress, RegistryError};

use crate::config::ClientConfig;
use crate::node::ConfirmationPolicy;
use crate::signer::{Signer, SignerError};

/// Snapshot of everything a single call needs from the session.
///
/// Captured once per call; never mutated afterwards, even if the session
/// re-connects mid-flight.
#[derive(Clone)]
pub struct RegistryHandle {
    /// The registry contract address.
    pub contract: ContractAddress,
    /// The paired caller identity — also used as `view_caller` on reads.
    pub caller: AccountAddress,
    /// The signer capability that will sign-and-submit.
    pub signer: Arc<dyn Signer>,
}

struct Paired {
    signer: Arc<dyn Signer>,
    caller: AccountAddress,
}

/// Holds the endpoint configuration and the paired signer for the
/// process lifetime.
pub struct Session {
    config: ClientConfig,
    paired: RwLock<Option<Paired>>,
}

impl Session {
    /// Create an unconnected session over the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            paired: RwLock::new(None),
        }
    }

    /// The session's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The confirmation policy derived from the configuration.
    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            depth: self.config.confirmation_depth,
            timeout_secs: self.config.confirmation_timeout_secs,
            poll_interval_ms: self.config.poll_interval_ms,
        }
    }

    /// Pair `signer` against the configured network and store it as the
    /// session's active signer.
    ///
    /// Re-invocation re-runs pairing — there is no dedup. On failure the
    /// previous signer (if any) stays active: a failed connect never
    /// corrupts session state.
    pub fn connect(&self, signer: Arc<dyn Signer>) -> Result<AccountAddress, SignerError> {
        let caller = signer.pair(&self.config.network)?;
        tracing::info!(caller = %caller, network = %self.config.network, "session connected");
        *self.paired.write() = Some(Paired {
            signer,
            caller: caller.clone(),
        });
        Ok(caller)
    }

    /// Whether a signer is currently paired.
    pub fn is_connected(&self) -> bool {
        self.paired.read().is_some()
    }

    /// The paired caller identity, if connected.
    pub fn caller(&self) -> Option<AccountAddress> {
        self.paired.read().as_ref().map(|p| p.caller.clone())
    }

    /// Snapshot a handle for one call, or fail with `NotConnected`.
    pub fn resolve_registry(&self) -> Result<RegistryHandle, RegistryError> {
        let guard = self.paired.read();
        let paired = guard.as_ref().ok_or(RegistryError::NotConnected)?;
        Ok(RegistryHandle {
            contract: self.config.registry_address.clone(),
            caller: paired.caller.clone(),
            signer: Arc::clone(&paired.signer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::OperationPayload;
    use vcreg_core::OperationHash;

    const KT1: &str = "KT1KDKY8fQS8Hg8nP1cdsPqntfdmx1F8zpbL";
    const TZ1: &str = "tz1WM1wDM4mdtD3qMiELJSgbB14ZryyHNu7P";
    const TZ2: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";

    struct StaticSigner {
        address: &'static str,
        fail_pairing: bool,
    }

    impl Signer for StaticSigner {
        fn pair(&self, _network: &str) -> Result<AccountAddress, SignerError> {
            if self.fail_pairing {
                return Err(SignerError::Rejected {
                    reason: "declined".into(),
                });
            }
            Ok(AccountAddress::new(self.address).unwrap())
        }

        fn sign_and_submit(
            &self,
            _payload: &OperationPayload,
        ) -> Result<OperationHash, SignerError> {
            Ok(OperationHash::new("ooTEST"))
        }
    }

    fn session() -> Session {
        Session::new(ClientConfig::new("https://rpc.example.com", KT1).unwrap())
    }

    #[test]
    fn resolve_fails_before_connect() {
        let session = session();
        assert!(!session.is_connected());
        assert!(matches!(
            session.resolve_registry(),
            Err(RegistryError::NotConnected)
        ));
    }

    #[test]
    fn connect_stores_paired_caller() {
        let session = session();
        let caller = session
            .connect(Arc::new(StaticSigner {
                address: TZ1,
                fail_pairing: false,
            }))
            .unwrap();
        assert_eq!(caller.as_str(), TZ1);
        assert_eq!(session.caller().unwrap().as_str(), TZ1);

        let handle = session.resolve_registry().unwrap();
        assert_eq!(handle.contract.as_str(), KT1);
        assert_eq!(handle.caller.as_str(), TZ1);
    }

    #[test]
    fn failed_connect_leaves_previous_signer_active() {
        let session = session();
        session
            .connect(Arc::new(StaticSigner {
                address: TZ1,
                fail_pairing: false,
            }))
            .unwrap();
        let err = session
            .connect(Arc::new(StaticSigner {
                address: TZ2,
                fail_pairing: true,
            }))
            .unwrap_err();
        assert!(matches!(err, SignerError::Rejected { .. }));
        // Prior pairing survives.
        assert_eq!(session.caller().unwrap().as_str(), TZ1);
    }

    #[test]
    fn reconnect_replaces_slot_without_touching_prior_handles() {
        let session = session();
        session
            .connect(Arc::new(StaticSigner {
                address: TZ1,
                fail_pairing: false,
            }))
            .unwrap();
        let in_flight = session.resolve_registry().unwrap();

        session
            .connect(Arc::new(StaticSigner {
                address: TZ2,
                fail_pairing: false,
            }))
            .unwrap();

        // The captured handle still carries the old caller; new calls
        // resolve the new one.
        assert_eq!(in_flight.caller.as_str(), TZ1);
        assert_eq!(session.resolve_registry().unwrap().caller.as_str(), TZ2);
    }
}
