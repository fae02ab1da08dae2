//! Structural validation of OAST subdomains
//!
//! A preamble is 20 base32hex characters. A full subdomain is a preamble
//! followed by a z-base-32 nonce of at least 13 characters.

use crate::base32::{is_base32hex_char, is_zbase32_char, PREAMBLE_CHARS};
use crate::domain::registry::split_subdomain;

/// Minimum nonce length in a full subdomain.
pub const MIN_NONCE_CHARS: usize = 13;

/// Minimum length of a full subdomain (preamble + nonce).
pub const MIN_SUBDOMAIN_CHARS: usize = PREAMBLE_CHARS + MIN_NONCE_CHARS;

/// True iff `s` is exactly 20 base32hex characters.
pub fn is_valid_preamble(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == PREAMBLE_CHARS && bytes.iter().all(|&c| is_base32hex_char(c))
}

/// True iff `s` is a preamble followed by at least 13 z-base-32 characters.
///
/// Hyphens and underscores are not accepted in the nonce here, unlike the
/// looser rule the text extractor applies.
pub fn is_valid_subdomain(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < MIN_SUBDOMAIN_CHARS {
        return false;
    }
    bytes[..PREAMBLE_CHARS].iter().all(|&c| is_base32hex_char(c))
        && bytes[PREAMBLE_CHARS..].iter().all(|&c| is_zbase32_char(c))
}

/// Validate a full OAST domain: known suffix, non-empty subdomain, valid structure.
pub fn validate_domain(input: &str) -> bool {
    match split_subdomain(input) {
        Some(subdomain) => is_valid_subdomain(subdomain),
        None => false,
    }
}
