//! # Entity Status Model
//!
//! Schemas, issuers, and bindings share one status taxonomy: a
//! non-negative integer code, with two reserved codes for the common
//! lifecycle states. Status changes are requested as a tagged
//! [`StatusRequest`] and resolved to a concrete [`StatusCode`] exactly
//! once — the same resolution for every entity kind. The only thing that
//! differs per kind is which mutating call carries the resolved code.
//!
//! Entities are never deleted: "deactivation" is the deprecated status
//! code, not removal.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// An entity status code as stored by the registry.
///
/// Codes `1` (active) and `2` (deprecated) are reserved; the registry's
/// issuer status table additionally documents `3` (in conflict). Any
/// other non-negative code is a caller-defined custom status and is
/// carried verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(u64);

impl StatusCode {
    /// Reserved code for an active entity.
    pub const ACTIVE: StatusCode = StatusCode(1);
    /// Reserved code for a deprecated (deactivated) entity.
    pub const DEPRECATED: StatusCode = StatusCode(2);
    /// Documented issuer-table code for a DID ownership conflict.
    pub const IN_CONFLICT: StatusCode = StatusCode(3);

    /// Wrap a raw status code.
    pub fn new(code: u64) -> Self {
        Self(code)
    }

    /// The raw integer value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Display label for the reserved codes, if this is one.
    pub fn label(&self) -> Option<&'static str> {
        match self.0 {
            1 => Some("active"),
            2 => Some("deprecated"),
            3 => Some("in_conflict"),
            _ => None,
        }
    }
}

impl From<u64> for StatusCode {
    fn from(code: u64) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{} ({label})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// A requested status transition, shared by every `set_*_status` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusRequest {
    /// Set the reserved active code.
    Activate,
    /// Set the reserved deprecated code.
    Deactivate,
    /// Set an explicit code. Must be a non-negative integer; validated
    /// by [`StatusRequest::resolve`].
    SetExplicit(i64),
}

impl StatusRequest {
    /// Resolve the request to the concrete code the mutating call will
    /// carry.
    ///
    /// Pure and order-independent: `Activate` and `Deactivate` always
    /// return the same reserved codes regardless of call history, and
    /// `SetExplicit(n)` returns `n` verbatim for every non-negative `n`.
    pub fn resolve(&self) -> Result<StatusCode, RegistryError> {
        match *self {
            Self::Activate => Ok(StatusCode::ACTIVE),
            Self::Deactivate => Ok(StatusCode::DEPRECATED),
            Self::SetExplicit(code) => {
                if code < 0 {
                    return Err(RegistryError::InvalidStatusCode { requested: code });
                }
                Ok(StatusCode::new(code as u64))
            }
        }
    }
}
