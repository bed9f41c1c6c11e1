//! # vcreg-core — Registry Domain Types
//!
//! Pure domain layer for the verifiable-credential registry client.
//! Provides:
//!
//! - **Identifier newtypes** ([`identity`]): schema ids, issuer DIDs,
//!   account and contract addresses, operation hashes. Each identifier is
//!   a distinct type — you cannot pass an [`AccountAddress`] where a
//!   [`ContractAddress`] is expected.
//! - **Status model** ([`status`]): the integer status taxonomy shared by
//!   schemas, issuers, and bindings, and the tagged
//!   [`StatusRequest`] transition resolved once for all entity kinds.
//! - **Encoding gate** ([`encoding`]): pre-flight validation that free-form
//!   string payloads fit the ledger's 7-bit string encoding, so operations
//!   the contract would reject are never submitted (and never burn fees).
//! - **View projections** ([`entity`]): the read-only records returned by
//!   the registry contract's views, mirrored one-to-one.
//! - **Error taxonomy** ([`error`]): the six caller-facing failure classes
//!   every registry call resolves to.
//!
//! This crate has no I/O and nothing async; everything here is synchronous
//! and deterministic by construction.

pub mod encoding;
pub mod entity;
pub mod error;
pub mod identity;
pub mod status;

// Re-export primary types.
pub use encoding::validate_encodable;
pub use entity::{BindingVerification, IssuerProjection, SchemaProjection};
pub use error::{RegistryError, ValidationError};
pub use identity::{AccountAddress, ContractAddress, IssuerDid, OperationHash, SchemaId};
pub use status::{StatusCode, StatusRequest};
