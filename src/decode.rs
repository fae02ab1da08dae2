//! Preamble decoding
//!
//! Layout of the 12 decoded bytes (all big-endian):
//!
//! ```text
//! 0..4   timestamp (u32 seconds)
//! 4..7   machine id
//! 7..9   pid (u16)
//! 9..12  counter (u24)
//! ```
//!
//! The decoder looks only at the text before the first dot. It never consults
//! the suffix registry.

use crate::base32::{decode_base32hex, PREAMBLE_BYTES, PREAMBLE_CHARS};
use crate::domain::validator::is_valid_preamble;
use crate::error::{OastError, Result};
use crate::extract::extract;
use crate::types::{DecodedPreamble, MachineId};

/// Longest subdomain the decoder accepts, in bytes.
pub const MAX_SUBDOMAIN_LEN: usize = 255;

/// Longest nonce kept in a decoded result, in bytes. Longer nonces are cut.
pub const MAX_NONCE_LEN: usize = 127;

/// Longest `original` kept in a decoded result, in bytes.
pub const MAX_ORIGINAL_LEN: usize = 255;

const KSORT_CHARS: usize = 6;
const CAMPAIGN_CHARS: usize = 5;

/// Decode an OAST subdomain, FQDN or bare preamble.
///
/// Never fails: problems are reported through `valid` and `error`.
pub fn decode(input: &str) -> DecodedPreamble {
    let original = truncate_at_char_boundary(input, MAX_ORIGINAL_LEN);
    match decode_fields(input) {
        Ok(mut decoded) => {
            decoded.original = original.to_string();
            decoded
        }
        Err(e) => {
            tracing::debug!(input = %original, error = %e, "OAST decode failed");
            DecodedPreamble::invalid(original, e.to_string())
        }
    }
}

/// Decode every OAST domain found in `text`, in extraction order.
///
/// Each result's `original` is the matched domain text.
pub fn extract_and_decode(text: &str) -> Result<Vec<DecodedPreamble>> {
    let matches = extract(text)?;
    let mut decoded = Vec::new();
    decoded
        .try_reserve_exact(matches.len())
        .map_err(|_| OastError::OutOfMemory)?;
    decoded.extend(matches.iter().map(|m| decode(m.as_str())));
    Ok(decoded)
}

fn decode_fields(input: &str) -> Result<DecodedPreamble> {
    if input.is_empty() {
        return Err(OastError::EmptyInput);
    }

    let subdomain = input.split('.').next().unwrap_or(input);
    if subdomain.len() > MAX_SUBDOMAIN_LEN {
        return Err(OastError::SubdomainTooLong);
    }
    let subdomain = subdomain.to_ascii_lowercase();

    if subdomain.len() < PREAMBLE_CHARS {
        return Err(OastError::SubdomainTooShort {
            actual: subdomain.len(),
        });
    }

    // Checked byte-wise first so slicing at 20 can't split a multi-byte char.
    if !subdomain.as_bytes()[..PREAMBLE_CHARS].is_ascii() {
        return Err(OastError::InvalidPreamble);
    }
    let (preamble, rest) = subdomain.split_at(PREAMBLE_CHARS);
    if !is_valid_preamble(preamble) {
        return Err(OastError::InvalidPreamble);
    }

    let nonce = truncate_at_char_boundary(rest, MAX_NONCE_LEN);

    let bytes: [u8; PREAMBLE_BYTES] =
        decode_base32hex(preamble).map_err(|_| OastError::PreambleDecodeFailed)?;

    Ok(DecodedPreamble {
        original: String::new(),
        valid: true,
        timestamp: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        machine_id: MachineId([bytes[4], bytes[5], bytes[6]]),
        pid: u16::from_be_bytes([bytes[7], bytes[8]]),
        counter: u32::from_be_bytes([0, bytes[9], bytes[10], bytes[11]]),
        ksort: preamble[..KSORT_CHARS].to_string(),
        campaign: preamble[KSORT_CHARS..KSORT_CHARS + CAMPAIGN_CHARS].to_string(),
        nonce: nonce.to_string(),
        error: None,
    })
}

/// Longest prefix of `s` that is at most `max` bytes and ends on a char boundary.
fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
