//! Base32 alphabets used by OAST identifiers.
//!
//! The preamble is base32hex (RFC 4648 "extended hex", lowercase); the nonce
//! uses z-base-32. Only base32hex needs positional decoding.

use crate::error::{OastError, Result};

/// Base32hex alphabet; a symbol's index is its value.
pub const BASE32HEX_ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// z-base-32 alphabet (membership only).
pub const ZBASE32_ALPHABET: &[u8; 32] = b"ybndrfg8ejkmcpqxot1uwisza345h769";

/// Number of base32hex characters in an encoded preamble.
pub const PREAMBLE_CHARS: usize = 20;

/// Number of bytes carried by a preamble. 20 symbols hold 100 bits; the last 4 are dropped.
pub const PREAMBLE_BYTES: usize = 12;

/// Case-insensitive base32hex membership.
#[inline]
pub fn is_base32hex_char(c: u8) -> bool {
    base32hex_value(c).is_some()
}

/// Case-insensitive z-base-32 membership.
#[inline]
pub fn is_zbase32_char(c: u8) -> bool {
    ZBASE32_ALPHABET.contains(&c.to_ascii_lowercase())
}

#[inline]
fn base32hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'v' => Some(c - b'a' + 10),
        b'A'..=b'V' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Decode a 20-character base32hex preamble into its 12 bytes.
///
/// Symbols are packed MSB-first; decoding stops once 12 bytes are out, so the
/// trailing 4 bits of the last symbol are discarded without being checked.
pub fn decode_base32hex(input: &str) -> Result<[u8; PREAMBLE_BYTES]> {
    let bytes = input.as_bytes();
    if bytes.len() != PREAMBLE_CHARS {
        return Err(OastError::InvalidLength {
            actual: bytes.len(),
        });
    }

    let mut out = [0u8; PREAMBLE_BYTES];
    let mut buffer = 0u64;
    let mut bits = 0u32;
    let mut written = 0usize;

    for (position, &c) in bytes.iter().enumerate() {
        // Every byte before `position` is ASCII, so it sits on a char boundary.
        let value = base32hex_value(c).ok_or_else(|| OastError::InvalidCharacter {
            character: input[position..].chars().next().unwrap_or('\u{fffd}'),
            position,
        })?;

        buffer = (buffer << 5) | u64::from(value);
        bits += 5;

        while bits >= 8 && written < PREAMBLE_BYTES {
            bits -= 8;
            out[written] = (buffer >> bits) as u8;
            written += 1;
        }
    }

    if written != PREAMBLE_BYTES {
        return Err(OastError::PreambleDecodeFailed);
    }
    Ok(out)
}

/// Encode 12 bytes as a 20-character base32hex preamble (final 4 bits zero).
pub fn encode_base32hex(bytes: &[u8; PREAMBLE_BYTES]) -> String {
    let mut out = String::with_capacity(PREAMBLE_CHARS);
    let mut buffer = 0u64;
    let mut bits = 0u32;

    for &b in bytes {
        buffer = (buffer << 8) | u64::from(b);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32HEX_ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32HEX_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}
