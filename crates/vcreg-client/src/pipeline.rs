//! # Operation Pipeline
//!
//! The one algorithm behind every registry call. Mutating calls walk
//! `Validating → Resolving → Submitting → AwaitingConfirmation →
//! Confirmed | Failed`; read calls walk `Resolving → Querying → Ready |
//! Failed`. Each transition emits a `tracing` event carrying the
//! entrypoint or view name and, once known, the operation hash.
//!
//! ## Failure mapping
//!
//! Failures surface as the fixed [`RegistryError`] taxonomy:
//!
//! - a non-encodable payload fails in `Validating` — nothing is submitted;
//! - a missing signer fails in `Resolving` — nothing is submitted;
//! - signer/network declines and on-chain application failures map to
//!   `SubmissionRejected` with the cause verbatim;
//! - unconfirmed, dropped, or unobservable operations map to
//!   `ConfirmationTimeout` after the policy's bounded wait.
//!
//! Nothing here retries: a mutating call is one submission, and
//! re-invoking it is the caller's decision.
//!
//! ## Concurrency
//!
//! A pipeline invocation is one independent flow over a snapshot
//! [`RegistryHandle`](crate::session::RegistryHandle). Invocations are
//! never serialized against each other — the ledger orders operations by
//! account counter. Abandoning a pending invocation stops the waiting,
//! never the submitted operation.

use serde_json::Value;
use vcreg_core::{validate_encodable, OperationHash, RegistryError};

use crate::calls::{Mutation, OperationPayload, View};
use crate::node::{NodeError, OperationReceipt, RegistryNode};
use crate::session::Session;

/// Named pipeline states, for progress reporting and tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    /// Checking payload encodability (mutating calls only).
    Validating,
    /// Resolving the session's registry handle.
    Resolving,
    /// Signing and injecting the operation.
    Submitting,
    /// Waiting for inclusion at the configured depth.
    AwaitingConfirmation,
    /// Terminal success for a mutating call.
    Confirmed,
    /// Executing a read-only view.
    Querying,
    /// Terminal success for a read call.
    Ready,
    /// Terminal failure.
    Failed,
}

impl std::fmt::Display for CallPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::Submitting => "submitting",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Confirmed => "confirmed",
            Self::Querying => "querying",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Terminal success of a mutating call.
#[derive(Debug, Clone)]
pub struct ConfirmedOperation {
    /// Hash of the confirmed operation.
    pub operation: OperationHash,
    /// The node's confirmation receipt.
    pub receipt: OperationReceipt,
    /// Server-assigned identity extracted from the result payload.
    /// `None` when the mutation assigns none, or when the confirmed
    /// payload lacks the expected slot — the typed client decides what a
    /// missing slot means for its call.
    pub assigned: Option<u64>,
}

/// Run a mutating call end to end.
pub fn execute_mutation(
    session: &Session,
    node: &dyn RegistryNode,
    mutation: &Mutation,
) -> Result<ConfirmedOperation, RegistryError> {
    let entrypoint = mutation.entrypoint();
    mutation_flow(session, node, mutation).map_err(|e| {
        tracing::warn!(call = entrypoint, phase = %CallPhase::Failed, error = %e, "mutation failed");
        e
    })
}

fn mutation_flow(
    session: &Session,
    node: &dyn RegistryNode,
    mutation: &Mutation,
) -> Result<ConfirmedOperation, RegistryError> {
    let entrypoint = mutation.entrypoint();

    tracing::debug!(%entrypoint, phase = %CallPhase::Validating, "mutation started");
    for (field, value) in mutation.gated_strings() {
        validate_encodable(field, value)?;
    }

    tracing::debug!(%entrypoint, phase = %CallPhase::Resolving, "payload validated");
    let handle = session.resolve_registry()?;

    tracing::debug!(
        %entrypoint,
        phase = %CallPhase::Submitting,
        contract = %handle.contract,
        "handle resolved"
    );
    let payload = OperationPayload {
        contract: handle.contract.clone(),
        entrypoint: entrypoint.to_string(),
        arguments: mutation.arguments(),
    };
    let operation = handle.signer.sign_and_submit(&payload).map_err(|e| {
        RegistryError::SubmissionRejected {
            cause: e.to_string(),
        }
    })?;

    let policy = session.confirmation_policy();
    tracing::debug!(
        %entrypoint,
        phase = %CallPhase::AwaitingConfirmation,
        operation = %operation,
        depth = policy.depth,
        "operation submitted"
    );
    let receipt = node
        .await_confirmation(&operation, &policy)
        .map_err(|e| match e {
            NodeError::OperationFailed { reason, .. } => {
                RegistryError::SubmissionRejected { cause: reason }
            }
            NodeError::ConfirmationTimedOut {
                operation,
                waited_secs,
            } => RegistryError::ConfirmationTimeout {
                operation,
                waited_secs,
            },
            other => {
                // The node became unobservable mid-wait; from the
                // caller's side this is indistinguishable from an
                // unconfirmed operation.
                tracing::warn!(error = %other, "node unobservable while awaiting confirmation");
                RegistryError::ConfirmationTimeout {
                    operation: operation.clone(),
                    waited_secs: policy.timeout_secs,
                }
            }
        })?;

    let assigned = mutation
        .result_extractor()
        .and_then(|extractor| extractor.extract(&receipt.internal_results));

    tracing::info!(
        %entrypoint,
        phase = %CallPhase::Confirmed,
        operation = %operation,
        level = receipt.included_at_level,
        "mutation confirmed"
    );
    Ok(ConfirmedOperation {
        operation,
        receipt,
        assigned,
    })
}

/// Run a read-only view call.
pub fn execute_view(
    session: &Session,
    node: &dyn RegistryNode,
    view: &View,
) -> Result<Value, RegistryError> {
    let name = view.name();

    tracing::debug!(view = name, phase = %CallPhase::Resolving, "view started");
    let handle = session.resolve_registry().map_err(|e| {
        tracing::warn!(call = name, phase = %CallPhase::Failed, error = %e, "view failed");
        e
    })?;

    tracing::debug!(
        view = name,
        phase = %CallPhase::Querying,
        contract = %handle.contract,
        "handle resolved"
    );
    let value = node
        .run_view(&handle.contract, view, &handle.caller)
        .map_err(|e| {
            let err = RegistryError::ViewQueryError {
                view: name.to_string(),
                cause: e.to_string(),
            };
            tracing::warn!(call = name, phase = %CallPhase::Failed, error = %err, "view failed");
            err
        })?;

    tracing::debug!(view = name, phase = %CallPhase::Ready, "view ready");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::node::ConfirmationPolicy;
    use crate::signer::{Signer, SignerError};
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use vcreg_core::{AccountAddress, ContractAddress, IssuerDid, SchemaId, StatusCode};

    const KT1: &str = "KT1KDKY8fQS8Hg8nP1cdsPqntfdmx1F8zpbL";
    const TZ1: &str = "tz1WM1wDM4mdtD3qMiELJSgbB14ZryyHNu7P";

    #[derive(Default)]
    struct CountingSigner {
        submissions: AtomicU32,
        reject: bool,
    }

    impl Signer for CountingSigner {
        fn pair(&self, _network: &str) -> Result<AccountAddress, SignerError> {
            Ok(AccountAddress::new(TZ1).unwrap())
        }

        fn sign_and_submit(
            &self,
            _payload: &OperationPayload,
        ) -> Result<OperationHash, SignerError> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(SignerError::Rejected {
                    reason: "user declined".into(),
                });
            }
            Ok(OperationHash::new("ooPIPE"))
        }
    }

    enum NodeBehavior {
        Confirm(Value),
        TimeOut,
    }

    struct ScriptedNode {
        behavior: NodeBehavior,
    }

    impl RegistryNode for ScriptedNode {
        fn await_confirmation(
            &self,
            operation: &OperationHash,
            policy: &ConfirmationPolicy,
        ) -> Result<OperationReceipt, NodeError> {
            match &self.behavior {
                NodeBehavior::Confirm(internal_results) => Ok(OperationReceipt {
                    operation: operation.clone(),
                    included_at_level: 7,
                    confirmations: policy.depth,
                    timestamp: Utc::now(),
                    internal_results: internal_results.clone(),
                }),
                NodeBehavior::TimeOut => Err(NodeError::ConfirmationTimedOut {
                    operation: operation.clone(),
                    waited_secs: policy.timeout_secs,
                }),
            }
        }

        fn run_view(
            &self,
            _contract: &ContractAddress,
            _view: &View,
            _view_caller: &AccountAddress,
        ) -> Result<Value, NodeError> {
            Ok(serde_json::json!({ "ok": true }))
        }
    }

    fn connected_session(signer: &Arc<CountingSigner>) -> Session {
        let session = Session::new(ClientConfig::new("https://rpc.example.com", KT1).unwrap());
        session
            .connect(Arc::clone(signer) as Arc<dyn Signer>)
            .unwrap();
        session
    }

    #[test]
    fn non_encodable_payload_never_reaches_submission() {
        let signer = Arc::new(CountingSigner::default());
        let session = connected_session(&signer);
        let node = ScriptedNode {
            behavior: NodeBehavior::Confirm(serde_json::json!([])),
        };

        let err = execute_mutation(
            &session,
            &node,
            &Mutation::AddSchema {
                schema_data: "héllo".into(),
            },
        )
        .unwrap_err();

        assert!(matches!(err, RegistryError::NonEncodableInput { .. }));
        assert_eq!(signer.submissions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn disconnected_session_never_reaches_submission() {
        let signer = Arc::new(CountingSigner::default());
        let session = Session::new(ClientConfig::new("https://rpc.example.com", KT1).unwrap());
        let node = ScriptedNode {
            behavior: NodeBehavior::Confirm(serde_json::json!([])),
        };

        let err = execute_mutation(
            &session,
            &node,
            &Mutation::AddSchema {
                schema_data: "hello".into(),
            },
        )
        .unwrap_err();

        assert!(matches!(err, RegistryError::NotConnected));
        assert_eq!(signer.submissions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn signer_rejection_maps_to_submission_rejected_with_cause() {
        let signer = Arc::new(CountingSigner {
            reject: true,
            ..Default::default()
        });
        let session = connected_session(&signer);
        let node = ScriptedNode {
            behavior: NodeBehavior::Confirm(serde_json::json!([])),
        };

        let err = execute_mutation(
            &session,
            &node,
            &Mutation::AddIssuer {
                issuer_did: IssuerDid::new("did:example:1").unwrap(),
                issuer_data: "data".into(),
            },
        )
        .unwrap_err();

        match err {
            RegistryError::SubmissionRejected { cause } => {
                assert!(cause.contains("user declined"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn confirmation_timeout_surfaces_operation_hash() {
        let signer = Arc::new(CountingSigner::default());
        let session = connected_session(&signer);
        let node = ScriptedNode {
            behavior: NodeBehavior::TimeOut,
        };

        let err = execute_mutation(
            &session,
            &node,
            &Mutation::SetSchemaStatus {
                schema_id: SchemaId::new(1),
                status: StatusCode::ACTIVE,
            },
        )
        .unwrap_err();

        match err {
            RegistryError::ConfirmationTimeout {
                operation,
                waited_secs,
            } => {
                assert_eq!(operation.as_str(), "ooPIPE");
                assert_eq!(waited_secs, 90);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn confirmed_add_schema_extracts_assigned_id() {
        let signer = Arc::new(CountingSigner::default());
        let session = connected_session(&signer);
        let node = ScriptedNode {
            behavior: NodeBehavior::Confirm(serde_json::json!([
                { "storage": [] },
                { "storage": ["meta", "owners", 5] }
            ])),
        };

        let confirmed = execute_mutation(
            &session,
            &node,
            &Mutation::AddSchema {
                schema_data: "hello".into(),
            },
        )
        .unwrap();

        assert_eq!(confirmed.assigned, Some(5));
        assert_eq!(confirmed.operation.as_str(), "ooPIPE");
    }

    #[test]
    fn missing_result_slot_confirms_without_assigned_identity() {
        let signer = Arc::new(CountingSigner::default());
        let session = connected_session(&signer);
        let node = ScriptedNode {
            behavior: NodeBehavior::Confirm(serde_json::json!([])),
        };

        // The mutation committed; only the result slot is missing. The
        // pipeline reports the confirmation and leaves the verdict on the
        // missing identity to the typed client.
        let confirmed = execute_mutation(
            &session,
            &node,
            &Mutation::AddSchema {
                schema_data: "hello".into(),
            },
        )
        .unwrap();

        assert_eq!(confirmed.assigned, None);
        assert_eq!(confirmed.operation.as_str(), "ooPIPE");
    }

    #[test]
    fn mutations_without_extractor_have_no_assigned_identity() {
        let signer = Arc::new(CountingSigner::default());
        let session = connected_session(&signer);
        let node = ScriptedNode {
            behavior: NodeBehavior::Confirm(serde_json::json!([])),
        };

        let confirmed = execute_mutation(
            &session,
            &node,
            &Mutation::BindIssuerSchema {
                issuer_did: IssuerDid::new("did:example:1").unwrap(),
                schema_id: SchemaId::new(3),
            },
        )
        .unwrap();

        assert_eq!(confirmed.assigned, None);
    }

    #[test]
    fn view_on_disconnected_session_fails_not_connected() {
        let session = Session::new(ClientConfig::new("https://rpc.example.com", KT1).unwrap());
        let node = ScriptedNode {
            behavior: NodeBehavior::Confirm(serde_json::json!([])),
        };

        let err = execute_view(
            &session,
            &node,
            &View::GetSchema {
                schema_id: SchemaId::new(1),
            },
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::NotConnected));
    }
}
