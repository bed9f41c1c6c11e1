//! Caller-facing error taxonomy for registry calls.
//!
//! Every registry operation — mutating or read-only — resolves to exactly
//! one of the [`RegistryError`] classes on failure. Local failures
//! (`NonEncodableInput`, `NotConnected`, `InvalidStatusCode`) are detected
//! before anything reaches the ledger and require corrected input; remote
//! failures carry the underlying cause message verbatim and are never
//! retried by the core — retrying is a caller decision.

use crate::identity::OperationHash;

/// Failure classes for registry calls.
///
/// No variant is fatal to the process: every call is independent, and a
/// failure never corrupts session state.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A free-form string argument contains a code point the ledger's
    /// string encoding cannot represent. Detected pre-flight; the
    /// operation was never submitted.
    #[error("field `{field}` is not encodable: code point U+{code_point:04X} at byte {offset}")]
    NonEncodableInput {
        /// The offending argument (e.g. `schema_data`, `issuer_did`).
        field: String,
        /// The first unrepresentable code point.
        code_point: u32,
        /// Byte offset of the offending character within the value.
        offset: usize,
    },

    /// No signer is paired; the session must `connect` before any call.
    #[error("not connected: no paired signer in session")]
    NotConnected,

    /// An explicit status code was requested with a value outside the
    /// non-negative integer range the registry accepts.
    #[error("invalid status code: {requested}")]
    InvalidStatusCode {
        /// The code the caller asked for.
        requested: i64,
    },

    /// The signer or network declined the operation before inclusion.
    #[error("submission rejected: {cause}")]
    SubmissionRejected {
        /// Underlying cause, verbatim.
        cause: String,
    },

    /// The operation was submitted but did not reach the configured
    /// confirmation depth in time, or was dropped from the mempool.
    #[error("confirmation timeout for operation {operation} after {waited_secs}s")]
    ConfirmationTimeout {
        /// Hash of the submitted operation.
        operation: OperationHash,
        /// Seconds waited before giving up.
        waited_secs: u64,
    },

    /// A read-only view query failed.
    #[error("view `{view}` failed: {cause}")]
    ViewQueryError {
        /// The view that was queried (e.g. `get_schema`).
        view: String,
        /// Underlying cause, verbatim.
        cause: String,
    },
}

impl RegistryError {
    /// Whether the failure was detected locally, before any submission.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NonEncodableInput { .. } | Self::NotConnected | Self::InvalidStatusCode { .. }
        )
    }
}

/// Errors from identifier construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The identifier string was empty.
    #[error("{what} must not be empty")]
    Empty {
        /// Which identifier was being constructed.
        what: &'static str,
    },

    /// The identifier does not match the expected shape.
    #[error("malformed {what}: {reason}")]
    Malformed {
        /// Which identifier was being constructed.
        what: &'static str,
        /// Description of the format violation.
        reason: String,
    },
}
