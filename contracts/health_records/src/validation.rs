use soroban_sdk::String;

use crate::ContractError;

const MAX_TITLE_LEN: u32 = 128;
const MAX_CONTENT_REF_LEN: u32 = 128;

/// Copy a short soroban `String` into `buf`, rejecting empty input or
/// anything longer than the buffer.
fn bounded_bytes<'a>(value: &String, buf: &'a mut [u8]) -> Result<&'a [u8], ContractError> {
    let len = value.len();
    if len == 0 || len as usize > buf.len() {
        return Err(ContractError::InvalidInput);
    }
    let bytes = &mut buf[..len as usize];
    value.copy_into_slice(bytes);
    Ok(bytes)
}

/// Validate a record title.
/// Titles are 1 to MAX_TITLE_LEN bytes of printable ASCII (space through `~`).
pub fn validate_title(title: &String) -> Result<(), ContractError> {
    let mut buf = [0u8; MAX_TITLE_LEN as usize];
    let bytes = bounded_bytes(title, &mut buf)?;

    if bytes.iter().all(|b| (32..=126).contains(b)) {
        Ok(())
    } else {
        Err(ContractError::InvalidInput)
    }
}

/// Validate a content reference (IPFS CID, hex digest, URI).
/// Only `[A-Za-z0-9]` and `- _ . : /` are accepted, so no whitespace or
/// control bytes end up in the ledger.
pub fn validate_content_ref(content_ref: &String) -> Result<(), ContractError> {
    let mut buf = [0u8; MAX_CONTENT_REF_LEN as usize];
    let bytes = bounded_bytes(content_ref, &mut buf)?;

    let valid = bytes
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':' | b'/'));
    if valid {
        Ok(())
    } else {
        Err(ContractError::InvalidInput)
    }
}
