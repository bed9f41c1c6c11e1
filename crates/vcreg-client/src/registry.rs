//! # Entity Registry Client
//!
//! Typed operations over the registry contract: schemas, issuers, and
//! issuer↔schema bindings. Every mutating call runs the operation
//! pipeline and then automatically reads the touched entity back through
//! the matching view, so the caller always sees the registry's own
//! post-mutation state — including the initial status of a freshly
//! created entity, which the client never assumes.
//!
//! Calls are synchronous (the capability adapters block on the ambient
//! runtime internally); from async code, wrap them in
//! `tokio::task::spawn_blocking`.

use std::sync::Arc;

use serde_json::Value;
use vcreg_core::{
    AccountAddress, BindingVerification, IssuerDid, IssuerProjection, OperationHash,
    RegistryError, SchemaId, SchemaProjection, StatusRequest,
};

use crate::calls::{Mutation, View};
use crate::node::RegistryNode;
use crate::pipeline;
use crate::session::Session;
use crate::signer::{Signer, SignerError};

/// The post-mutation refresh of the touched entity.
///
/// Read-back failure never reverts a mutation's success — the operation
/// already committed — so it is reported here instead of as a call
/// failure.
#[derive(Debug, Clone)]
pub enum ReadBack {
    /// The refreshed view projection, verbatim.
    Projection(Value),
    /// The read-back query failed; the mutation itself is confirmed.
    Unavailable {
        /// Cause of the failed refresh, verbatim.
        cause: String,
    },
}

/// Terminal success of a typed mutating call.
#[derive(Debug, Clone)]
pub struct Confirmed<T> {
    /// Hash of the confirmed operation.
    pub operation: OperationHash,
    /// Call-specific result — the assigned [`SchemaId`] for
    /// `add_schema`, `()` elsewhere.
    pub value: T,
    /// Automatic post-mutation refresh of the touched entity.
    pub read_back: ReadBack,
}

/// Client for one registry contract, over one session.
pub struct RegistryClient {
    session: Arc<Session>,
    node: Arc<dyn RegistryNode>,
}

impl RegistryClient {
    /// Create a client over a session and a node capability.
    pub fn new(session: Arc<Session>, node: Arc<dyn RegistryNode>) -> Self {
        Self { session, node }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Pair a signer and make it the session's active signer.
    pub fn connect(&self, signer: Arc<dyn Signer>) -> Result<AccountAddress, SignerError> {
        self.session.connect(signer)
    }

    // ─── Schemas ────────────────────────────────────────────────────────

    /// Register a new schema. The registry assigns and returns its id.
    pub fn add_schema(&self, schema_data: &str) -> Result<Confirmed<SchemaId>, RegistryError> {
        let confirmed = self.mutate(Mutation::AddSchema {
            schema_data: schema_data.to_string(),
        })?;
        let schema_id = match confirmed.assigned {
            Some(id) => SchemaId::new(id),
            // The operation committed but its result payload lacked the
            // id slot. Reported as a read-side failure carrying the
            // operation hash so the caller can locate the created schema.
            None => {
                return Err(RegistryError::ViewQueryError {
                    view: "add_schema(result)".into(),
                    cause: format!(
                        "operation {} confirmed but its result payload has no schema id at the expected slot",
                        confirmed.operation
                    ),
                })
            }
        };
        let read_back = self.read_back(View::GetSchema { schema_id });
        Ok(Confirmed {
            operation: confirmed.operation,
            value: schema_id,
            read_back,
        })
    }

    /// Set a schema's status.
    pub fn set_schema_status(
        &self,
        schema_id: SchemaId,
        request: StatusRequest,
    ) -> Result<Confirmed<()>, RegistryError> {
        let status = request.resolve()?;
        let confirmed = self.mutate(Mutation::SetSchemaStatus { schema_id, status })?;
        let read_back = self.read_back(View::GetSchema { schema_id });
        Ok(Confirmed {
            operation: confirmed.operation,
            value: (),
            read_back,
        })
    }

    /// Look up a schema by id.
    pub fn get_schema(&self, schema_id: SchemaId) -> Result<SchemaProjection, RegistryError> {
        self.query(View::GetSchema { schema_id })
    }

    // ─── Issuers ────────────────────────────────────────────────────────

    /// Register an issuer under a caller-chosen DID, or overwrite the
    /// record for an existing DID.
    pub fn add_issuer(
        &self,
        issuer_did: &IssuerDid,
        issuer_data: &str,
    ) -> Result<Confirmed<()>, RegistryError> {
        let confirmed = self.mutate(Mutation::AddIssuer {
            issuer_did: issuer_did.clone(),
            issuer_data: issuer_data.to_string(),
        })?;
        let read_back = self.read_back(View::GetIssuer {
            issuer_did: issuer_did.clone(),
        });
        Ok(Confirmed {
            operation: confirmed.operation,
            value: (),
            read_back,
        })
    }

    /// Set an issuer's status.
    pub fn set_issuer_status(
        &self,
        issuer_did: &IssuerDid,
        request: StatusRequest,
    ) -> Result<Confirmed<()>, RegistryError> {
        let status = request.resolve()?;
        let confirmed = self.mutate(Mutation::SetIssuerStatus {
            issuer_did: issuer_did.clone(),
            status,
        })?;
        let read_back = self.read_back(View::GetIssuer {
            issuer_did: issuer_did.clone(),
        });
        Ok(Confirmed {
            operation: confirmed.operation,
            value: (),
            read_back,
        })
    }

    /// Transfer ownership of an issuer record.
    pub fn set_issuer_owner(
        &self,
        issuer_did: &IssuerDid,
        owner: &AccountAddress,
    ) -> Result<Confirmed<()>, RegistryError> {
        let confirmed = self.mutate(Mutation::SetIssuerOwner {
            issuer_did: issuer_did.clone(),
            owner: owner.clone(),
        })?;
        let read_back = self.read_back(View::GetIssuer {
            issuer_did: issuer_did.clone(),
        });
        Ok(Confirmed {
            operation: confirmed.operation,
            value: (),
            read_back,
        })
    }

    /// Look up an issuer by DID.
    pub fn get_issuer(&self, issuer_did: &IssuerDid) -> Result<IssuerProjection, RegistryError> {
        self.query(View::GetIssuer {
            issuer_did: issuer_did.clone(),
        })
    }

    // ─── Bindings ───────────────────────────────────────────────────────

    /// Bind an issuer to a schema it may issue against.
    pub fn bind_issuer_schema(
        &self,
        issuer_did: &IssuerDid,
        schema_id: SchemaId,
    ) -> Result<Confirmed<()>, RegistryError> {
        let confirmed = self.mutate(Mutation::BindIssuerSchema {
            issuer_did: issuer_did.clone(),
            schema_id,
        })?;
        let read_back = self.read_back(View::VerifyBinding {
            issuer_did: issuer_did.clone(),
            schema_id,
        });
        Ok(Confirmed {
            operation: confirmed.operation,
            value: (),
            read_back,
        })
    }

    /// Set a binding's status.
    pub fn set_binding_status(
        &self,
        issuer_did: &IssuerDid,
        schema_id: SchemaId,
        request: StatusRequest,
    ) -> Result<Confirmed<()>, RegistryError> {
        let status = request.resolve()?;
        let confirmed = self.mutate(Mutation::SetBindingStatus {
            issuer_did: issuer_did.clone(),
            schema_id,
            status,
        })?;
        let read_back = self.read_back(View::VerifyBinding {
            issuer_did: issuer_did.clone(),
            schema_id,
        });
        Ok(Confirmed {
            operation: confirmed.operation,
            value: (),
            read_back,
        })
    }

    /// Check whether an issuer is currently authorized for a schema.
    ///
    /// This is the single source of truth for the question — the
    /// registry evaluates its own status rules over both the issuer and
    /// the binding. Composing `get_issuer` with binding-existence checks
    /// client-side would race and miss registry-only rules.
    pub fn verify_binding(
        &self,
        issuer_did: &IssuerDid,
        schema_id: SchemaId,
    ) -> Result<BindingVerification, RegistryError> {
        self.query(View::VerifyBinding {
            issuer_did: issuer_did.clone(),
            schema_id,
        })
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn mutate(&self, mutation: Mutation) -> Result<pipeline::ConfirmedOperation, RegistryError> {
        pipeline::execute_mutation(&self.session, self.node.as_ref(), &mutation)
    }

    fn query<T: serde::de::DeserializeOwned>(&self, view: View) -> Result<T, RegistryError> {
        let name = view.name();
        let value = pipeline::execute_view(&self.session, self.node.as_ref(), &view)?;
        serde_json::from_value(value).map_err(|e| RegistryError::ViewQueryError {
            view: name.to_string(),
            cause: format!("projection deserialization failed: {e}"),
        })
    }

    fn read_back(&self, view: View) -> ReadBack {
        match pipeline::execute_view(&self.session, self.node.as_ref(), &view) {
            Ok(value) => ReadBack::Projection(value),
            Err(e) => {
                tracing::warn!(view = view.name(), error = %e, "post-mutation read-back failed");
                ReadBack::Unavailable {
                    cause: e.to_string(),
                }
            }
        }
    }
}
