//! # Identity Newtypes
//!
//! Domain-primitive newtypes for every identifier the registry client
//! handles. Each identifier is a distinct type, so a call site cannot
//! confuse an issuer DID with an account address or a schema id with a
//! status code.
//!
//! ## Validation
//!
//! String-based identifiers validate shape at construction time and route
//! `Deserialize` through their constructor, so invalid values are rejected
//! at the wire boundary rather than silently accepted. [`SchemaId`] is a
//! plain integer and always valid by construction — the registry assigns
//! it, the client never chooses it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// A schema identifier, assigned by the registry when the schema is
/// created. Never chosen by the caller: the value is extracted from the
/// confirmed creation operation's result payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(u64);

impl SchemaId {
    /// Wrap a registry-assigned schema id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw integer value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SchemaId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decentralized identifier naming an issuer. Caller-chosen and unique
/// within the registry.
///
/// The registry itself places no structural requirement on the DID beyond
/// its string encoding, so construction only rejects the empty string;
/// encodability is checked by the pipeline's validation gate, which knows
/// which argument the value was passed as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IssuerDid(String);

impl IssuerDid {
    /// Create an issuer DID. Fails on the empty string.
    pub fn new(did: impl Into<String>) -> Result<Self, ValidationError> {
        let did = did.into();
        if did.is_empty() {
            return Err(ValidationError::Empty { what: "issuer DID" });
        }
        Ok(Self(did))
    }

    /// The DID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(IssuerDid);

impl std::fmt::Display for IssuerDid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for IssuerDid {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A ledger account identifier — the owner address attached to issuers
/// and the caller identity obtained from signer pairing.
///
/// Implicit accounts carry a `tz` prefix (`tz1`/`tz2`/`tz3`) and are 36
/// characters of base58; only the prefix and charset are checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Create an account address, checking prefix and charset.
    pub fn new(address: impl Into<String>) -> Result<Self, ValidationError> {
        let address = address.into();
        validate_base58_with_prefix(&address, "account address", &["tz1", "tz2", "tz3"])?;
        Ok(Self(address))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(AccountAddress);

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The address of an originated contract — here, the registry contract
/// the client targets. Carries a `KT1` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContractAddress(String);

impl ContractAddress {
    /// Create a contract address, checking prefix and charset.
    pub fn new(address: impl Into<String>) -> Result<Self, ValidationError> {
        let address = address.into();
        validate_base58_with_prefix(&address, "contract address", &["KT1"])?;
        Ok(Self(address))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(ContractAddress);

impl std::fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ContractAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The hash identifying a submitted operation. Opaque to the client; it
/// is returned by the signer on submission and echoed in receipts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHash(String);

impl OperationHash {
    /// Wrap an operation hash as reported by the signer or node.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check a base58check-style address: known prefix, expected length,
/// base58 charset (no `0`, `O`, `I`, `l`).
fn validate_base58_with_prefix(
    value: &str,
    what: &'static str,
    prefixes: &[&str],
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { what });
    }
    if !prefixes.iter().any(|p| value.starts_with(p)) {
        return Err(ValidationError::Malformed {
            what,
            reason: format!("expected prefix one of {prefixes:?}"),
        });
    }
    if value.len() != 36 {
        return Err(ValidationError::Malformed {
            what,
            reason: format!("expected 36 characters, got {}", value.len()),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() || matches!(c, '0' | 'O' | 'I' | 'l'))
    {
        return Err(ValidationError::Malformed {
            what,
            reason: format!("invalid base58 character {bad:?}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ1: &str = "tz1WM1wDM4mdtD3qMiELJSgbB14ZryyHNu7P";
    const KT1: &str = "KT1KDKY8fQS8Hg8nP1cdsPqntfdmx1F8zpbL";

    #[test]
    fn schema_id_roundtrips_value() {
        let id = SchemaId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(format!("{id}"), "42");
        assert_eq!(SchemaId::from(42), id);
    }

    #[test]
    fn issuer_did_accepts_any_nonempty_string() {
        let did = IssuerDid::new("did:example:1").unwrap();
        assert_eq!(did.as_str(), "did:example:1");
        // Non-ASCII is allowed at construction; the encoding gate rejects
        // it at submission time with the field name attached.
        assert!(IssuerDid::new("did:ex:héllo").is_ok());
    }

    #[test]
    fn issuer_did_rejects_empty() {
        assert_eq!(
            IssuerDid::new(""),
            Err(ValidationError::Empty { what: "issuer DID" })
        );
    }

    #[test]
    fn account_address_accepts_tz_prefixes() {
        assert!(AccountAddress::new(TZ1).is_ok());
    }

    #[test]
    fn account_address_rejects_contract_prefix() {
        assert!(AccountAddress::new(KT1).is_err());
    }

    #[test]
    fn contract_address_accepts_kt1() {
        let addr = ContractAddress::new(KT1).unwrap();
        assert_eq!(addr.as_str(), KT1);
    }

    #[test]
    fn contract_address_rejects_wrong_length() {
        assert!(ContractAddress::new("KT1short").is_err());
    }

    #[test]
    fn addresses_reject_non_base58_characters() {
        // 'O' is not in the base58 alphabet.
        let bad = format!("tz1{}", "O".repeat(33));
        assert!(AccountAddress::new(bad).is_err());
    }

    #[test]
    fn deserialize_rejects_malformed_address() {
        let result: Result<AccountAddress, _> = serde_json::from_str("\"not-an-address\"");
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_accepts_valid_address() {
        let json = format!("\"{TZ1}\"");
        let addr: AccountAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr.as_str(), TZ1);
    }

    #[test]
    fn operation_hash_is_opaque() {
        let hash = OperationHash::new("oo6JPEAy8VuMRGaFuMmLNFFGdJgiaKfnmT1CpHJfKP3Ye5ZahiP");
        assert!(hash.as_str().starts_with("oo"));
    }
}
