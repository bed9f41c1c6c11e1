//! # Ledger String-Encoding Gate
//!
//! The ledger's string type accepts only the 7-bit range — control and
//! printable ASCII, code points 0 through 127. The registry contract
//! cannot state this requirement through any interface the client sees,
//! so a payload with a wider code point would be accepted by the signer,
//! consume fees, and then fail at application time.
//!
//! Every free-form string argument (schema data, issuer DID, issuer data)
//! passes through [`validate_encodable`] before an operation is
//! constructed. Numeric ids, status codes, and addresses have their own
//! encodings and are not gated.

use crate::error::RegistryError;

/// Whether a string fits the ledger's 7-bit string encoding.
pub fn is_encodable(value: &str) -> bool {
    value.is_ascii()
}

/// Validate that `value` fits the ledger's string encoding.
///
/// On failure, reports the argument name plus the first offending code
/// point and its byte offset, so the caller knows exactly which field to
/// correct. The pipeline short-circuits on this error: nothing is
/// submitted.
pub fn validate_encodable(field: &str, value: &str) -> Result<(), RegistryError> {
    match value.char_indices().find(|(_, c)| !c.is_ascii()) {
        None => Ok(()),
        Some((offset, c)) => Err(RegistryError::NonEncodableInput {
            field: field.to_string(),
            code_point: c as u32,
            offset,
        }),
    }
}
