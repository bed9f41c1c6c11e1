//! # View Projections
//!
//! The read-only records returned by the registry contract's views,
//! mirrored one-to-one. The client does not reshape view results beyond
//! deserializing them — all entity state is owned by the ledger, and
//! these are transient last-read projections for display, never an
//! authoritative cache.

use serde::{Deserialize, Serialize};

use crate::identity::AccountAddress;
use crate::status::StatusCode;

/// Projection of a registered schema, as returned by the `get_schema`
/// view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProjection {
    /// The opaque schema payload as registered.
    pub schema_data: String,
    /// Current status code.
    pub status: StatusCode,
    /// Registry-side label for the status, when the code is in the
    /// registry's status table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_label: Option<String>,
}

/// Projection of a registered issuer, as returned by the `get_issuer`
/// view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerProjection {
    /// The opaque issuer payload as registered.
    pub issuer_data: String,
    /// The account that currently owns the issuer record. Mutable via
    /// `set_issuer_owner`, independently of status.
    pub owner: AccountAddress,
    /// Current status code.
    pub status: StatusCode,
    /// Registry-side label for the status, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_label: Option<String>,
}

/// Result of the `verify_binding` view — the single source of truth for
/// "is this issuer currently authorized for this schema".
///
/// The registry computes `authorized` from the live status of both the
/// issuer and the binding; the client must never reconstruct it from
/// separate `get_issuer` calls and binding-existence checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingVerification {
    /// Whether the issuer is currently authorized for the schema.
    pub authorized: bool,
    /// The issuer's status at verification time, when the registry
    /// reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_status: Option<StatusCode>,
    /// The binding's status at verification time, when the registry
    /// reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_status: Option<StatusCode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_projection_deserializes_view_record() {
        let json = serde_json::json!({
            "schema_data": "hello",
            "status": 1,
            "status_label": "active"
        });
        let projection: SchemaProjection = serde_json::from_value(json).unwrap();
        assert_eq!(projection.schema_data, "hello");
        assert_eq!(projection.status, StatusCode::ACTIVE);
        assert_eq!(projection.status_label.as_deref(), Some("active"));
    }

    #[test]
    fn status_label_is_optional() {
        let json = serde_json::json!({ "schema_data": "x", "status": 17 });
        let projection: SchemaProjection = serde_json::from_value(json).unwrap();
        assert_eq!(projection.status, StatusCode::new(17));
        assert!(projection.status_label.is_none());
    }

    #[test]
    fn issuer_projection_deserializes_view_record() {
        let json = serde_json::json!({
            "issuer_data": "Example University",
            "owner": "tz1WM1wDM4mdtD3qMiELJSgbB14ZryyHNu7P",
            "status": 2,
            "status_label": "deprecated"
        });
        let projection: IssuerProjection = serde_json::from_value(json).unwrap();
        assert_eq!(projection.status, StatusCode::DEPRECATED);
        assert_eq!(
            projection.owner.as_str(),
            "tz1WM1wDM4mdtD3qMiELJSgbB14ZryyHNu7P"
        );
    }

    #[test]
    fn binding_verification_minimal_record() {
        let json = serde_json::json!({ "authorized": false });
        let v: BindingVerification = serde_json::from_value(json).unwrap();
        assert!(!v.authorized);
        assert!(v.issuer_status.is_none());
        assert!(v.binding_status.is_none());
    }
}
