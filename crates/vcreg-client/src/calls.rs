//! # Call Catalogue
//!
//! Every mutating entrypoint and read-only view the registry contract
//! exposes, as typed definitions. Each [`Mutation`] knows its entrypoint
//! name, its wire arguments, which of its arguments are free-form strings
//! subject to the encoding gate, and — where the contract assigns an
//! identity server-side — a [`ResultExtractor`] locating that identity in
//! the confirmed operation's nested result payload.
//!
//! Keeping the extractor next to the mutation definition keeps the
//! pipeline generic: result-slot indexing is contract-version specific
//! and lives in exactly one place per mutation, never in the pipeline.

use serde_json::{json, Value};
use vcreg_core::{AccountAddress, ContractAddress, IssuerDid, SchemaId, StatusCode};

/// A mutating registry call with resolved arguments.
///
/// Status-changing variants carry an already-resolved [`StatusCode`] —
/// resolution happens once, in
/// [`StatusRequest::resolve`](vcreg_core::StatusRequest::resolve),
/// identically for all entity kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Register a new schema; the registry assigns its id.
    AddSchema {
        /// Opaque schema payload.
        schema_data: String,
    },
    /// Set a schema's status code.
    SetSchemaStatus {
        /// Target schema.
        schema_id: SchemaId,
        /// Resolved status code to store.
        status: StatusCode,
    },
    /// Register a new issuer, or overwrite the record for an existing DID.
    AddIssuer {
        /// Caller-chosen unique DID.
        issuer_did: IssuerDid,
        /// Opaque issuer payload.
        issuer_data: String,
    },
    /// Set an issuer's status code.
    SetIssuerStatus {
        /// Target issuer.
        issuer_did: IssuerDid,
        /// Resolved status code to store.
        status: StatusCode,
    },
    /// Transfer ownership of an issuer record.
    SetIssuerOwner {
        /// Target issuer.
        issuer_did: IssuerDid,
        /// New owning account.
        owner: AccountAddress,
    },
    /// Bind an issuer to a schema it may use.
    BindIssuerSchema {
        /// Issuer side of the binding.
        issuer_did: IssuerDid,
        /// Schema side of the binding.
        schema_id: SchemaId,
    },
    /// Set a binding's status code.
    SetBindingStatus {
        /// Issuer side of the binding.
        issuer_did: IssuerDid,
        /// Schema side of the binding.
        schema_id: SchemaId,
        /// Resolved status code to store.
        status: StatusCode,
    },
}

impl Mutation {
    /// The contract entrypoint this mutation invokes.
    pub fn entrypoint(&self) -> &'static str {
        match self {
            Self::AddSchema { .. } => "add_schema",
            Self::SetSchemaStatus { .. } => "set_schema_status",
            Self::AddIssuer { .. } => "add_issuer",
            Self::SetIssuerStatus { .. } => "set_issuer_status",
            Self::SetIssuerOwner { .. } => "set_issuer_owner",
            Self::BindIssuerSchema { .. } => "bind_issuer_schema",
            Self::SetBindingStatus { .. } => "set_binding_status",
        }
    }

    /// The entrypoint's argument record, in wire form.
    pub fn arguments(&self) -> Value {
        match self {
            Self::AddSchema { schema_data } => json!({ "schema_data": schema_data }),
            Self::SetSchemaStatus { schema_id, status } => json!({
                "schema_id": schema_id,
                "status": status,
            }),
            Self::AddIssuer {
                issuer_did,
                issuer_data,
            } => json!({
                "issuer_did": issuer_did,
                "issuer_data": issuer_data,
            }),
            Self::SetIssuerStatus { issuer_did, status } => json!({
                "issuer_did": issuer_did,
                "status": status,
            }),
            Self::SetIssuerOwner { issuer_did, owner } => json!({
                "issuer_did": issuer_did,
                "owner": owner,
            }),
            Self::BindIssuerSchema {
                issuer_did,
                schema_id,
            } => json!({
                "issuer_did": issuer_did,
                "schema_id": schema_id,
            }),
            Self::SetBindingStatus {
                issuer_did,
                schema_id,
                status,
            } => json!({
                "issuer_did": issuer_did,
                "schema_id": schema_id,
                "status": status,
            }),
        }
    }

    /// The free-form string arguments subject to the encoding gate, as
    /// `(field name, value)` pairs.
    ///
    /// Numeric ids, status codes, and owner addresses have their own wire
    /// encodings and are deliberately absent.
    pub fn gated_strings(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::AddSchema { schema_data } => vec![("schema_data", schema_data.as_str())],
            Self::SetSchemaStatus { .. } => vec![],
            Self::AddIssuer {
                issuer_did,
                issuer_data,
            } => vec![
                ("issuer_did", issuer_did.as_str()),
                ("issuer_data", issuer_data.as_str()),
            ],
            Self::SetIssuerStatus { issuer_did, .. }
            | Self::SetIssuerOwner { issuer_did, .. }
            | Self::BindIssuerSchema { issuer_did, .. }
            | Self::SetBindingStatus { issuer_did, .. } => {
                vec![("issuer_did", issuer_did.as_str())]
            }
        }
    }

    /// The extractor for a server-assigned identity in this mutation's
    /// confirmed result, if the contract assigns one.
    pub fn result_extractor(&self) -> Option<ResultExtractor> {
        match self {
            // The storage contract appends the new schema under the next
            // counter value; the assigned id surfaces in the second
            // internal operation's updated storage, third slot. Tied to
            // the deployed contract version.
            Self::AddSchema { .. } => Some(ResultExtractor::new(
                "schema_id",
                &[Seg::Index(1), Seg::Key("storage"), Seg::Index(2)],
            )),
            _ => None,
        }
    }
}

/// A read-only view call with resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Look up a schema by id.
    GetSchema {
        /// Target schema.
        schema_id: SchemaId,
    },
    /// Look up an issuer by DID.
    GetIssuer {
        /// Target issuer.
        issuer_did: IssuerDid,
    },
    /// Check whether an issuer is currently authorized for a schema.
    VerifyBinding {
        /// Issuer side of the binding.
        issuer_did: IssuerDid,
        /// Schema side of the binding.
        schema_id: SchemaId,
    },
}

impl View {
    /// The contract view this call queries.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetSchema { .. } => "get_schema",
            Self::GetIssuer { .. } => "get_issuer",
            Self::VerifyBinding { .. } => "verify_binding",
        }
    }

    /// The view's argument, in wire form.
    pub fn arguments(&self) -> Value {
        match self {
            Self::GetSchema { schema_id } => json!(schema_id),
            Self::GetIssuer { issuer_did } => json!(issuer_did),
            Self::VerifyBinding {
                issuer_did,
                schema_id,
            } => json!({
                "issuer_did": issuer_did,
                "schema_id": schema_id,
            }),
        }
    }
}

/// A fully constructed operation ready for signing and submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OperationPayload {
    /// The contract the operation targets.
    pub contract: ContractAddress,
    /// Entrypoint name.
    pub entrypoint: String,
    /// Entrypoint argument record.
    pub arguments: Value,
}

/// One step into a nested result payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seg {
    /// Descend into an object field.
    Key(&'static str),
    /// Descend into an array element.
    Index(usize),
}

/// Locates a server-assigned identity inside a confirmed operation's
/// nested result payload.
///
/// Registered per mutation in [`Mutation::result_extractor`]; the
/// pipeline walks the segment path generically and never hardcodes slot
/// positions itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultExtractor {
    /// What the extracted value is, for diagnostics (e.g. `schema_id`).
    pub what: &'static str,
    path: &'static [Seg],
}

impl ResultExtractor {
    /// Define an extractor over a segment path rooted at the receipt's
    /// internal-results payload.
    pub fn new(what: &'static str, path: &'static [Seg]) -> Self {
        Self { what, path }
    }

    /// Walk the path and pull out the assigned integer identity.
    ///
    /// Returns `None` when the payload does not have the expected shape —
    /// the caller reports this as an extraction failure with the
    /// mutation's name attached, rather than guessing.
    pub fn extract(&self, internal_results: &Value) -> Option<u64> {
        let mut cursor = internal_results;
        for seg in self.path {
            cursor = match *seg {
                Seg::Key(key) => cursor.get(key)?,
                Seg::Index(index) => cursor.get(index)?,
            };
        }
        // The contract stores nats; tolerate a decimal string encoding.
        cursor
            .as_u64()
            .or_else(|| cursor.as_str().and_then(|s| s.parse().ok()))
    }
}
