use alloy::primitives::Address;

use crate::error::{TokenError, TokenResult};

/// Validate a hex address and return it as a typed [`Address`].
///
/// Accepts 40 hex digits with an optional `0x` prefix. Single-case input is
/// taken as-is; mixed-case input must carry a valid EIP-55 checksum.
pub fn normalize(raw: &str) -> TokenResult<Address> {
    let invalid = |reason: &str| TokenError::InvalidAddress {
        address: raw.to_string(),
        reason: reason.to_string(),
    };

    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    if digits.len() != 40 {
        return Err(invalid(&format!("expected 40 hex digits, got {}", digits.len())));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{digits}"), None)
            .map_err(|_| invalid("checksum mismatch"))
    } else {
        digits.parse::<Address>().map_err(|e| invalid(&e.to_string()))
    }
}

/// Canonical checksum-cased rendering.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}

/// Normalize and render in one step.
pub fn to_checksum(raw: &str) -> TokenResult<String> {
    normalize(raw).map(|a| checksum(&a))
}

/// Cache key form of an address.
pub fn cache_key(address: &Address) -> String {
    format!("{address:#x}").to_lowercase()
}
