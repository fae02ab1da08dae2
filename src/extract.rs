//! Locate OAST domains inside arbitrary text.
//!
//! Each known suffix is scanned for independently, in registry order. For
//! every occurrence preceded by a dot the label in front of it is walked back
//! and checked structurally. Boundaries are enforced on both sides so a
//! suffix buried inside a longer domain (`x.oast.pro.evil.com`) never matches.
//!
//! Matches do not overlap within one suffix's pass. Matches from different
//! suffixes are neither merged nor de-duplicated against each other.

use std::ops::Range;

use crate::base32::{is_base32hex_char, is_zbase32_char, PREAMBLE_CHARS};
use crate::domain::is_subdomain_char;
use crate::domain::registry::KNOWN_SUFFIXES;
use crate::domain::validator::MIN_SUBDOMAIN_CHARS;
use crate::error::{OastError, Result};

const INITIAL_CAPACITY: usize = 16;

/// An OAST domain found in a source text. Borrows the text it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    source: &'a str,
    /// Byte range of subdomain + '.' + suffix
    pub full_span: Range<usize>,
    /// Byte range of the subdomain alone
    pub subdomain_span: Range<usize>,
    /// The registry entry that matched
    pub suffix: &'static str,
}

impl<'a> Match<'a> {
    /// The matched domain, as it appears in the source.
    pub fn as_str(&self) -> &'a str {
        &self.source[self.full_span.clone()]
    }

    /// The subdomain portion, without the dot and suffix.
    pub fn subdomain(&self) -> &'a str {
        &self.source[self.subdomain_span.clone()]
    }

    pub fn start(&self) -> usize {
        self.full_span.start
    }

    pub fn end(&self) -> usize {
        self.full_span.end
    }
}

impl std::fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Find every OAST domain in `text`.
///
/// Results are ordered by suffix (registry order), then by position.
/// Only allocation failure is an error.
pub fn extract(text: &str) -> Result<Vec<Match<'_>>> {
    let mut matches = Vec::new();
    if text.is_empty() {
        return Ok(matches);
    }

    for &suffix in KNOWN_SUFFIXES {
        let before = matches.len();
        scan_suffix(text, suffix, &mut matches)?;
        if matches.len() > before {
            tracing::debug!(suffix, count = matches.len() - before, "OAST suffix scan");
        }
    }

    Ok(matches)
}

/// Matched domains as substrings of `text`, in [`extract`] order.
pub fn extract_domains(text: &str) -> Result<Vec<&str>> {
    Ok(extract(text)?.into_iter().map(|m| m.as_str()).collect())
}

fn scan_suffix<'a>(text: &'a str, suffix: &'static str, out: &mut Vec<Match<'a>>) -> Result<()> {
    let bytes = text.as_bytes();
    let needle = suffix.as_bytes();
    if bytes.len() < needle.len() {
        return Ok(());
    }

    let last_start = bytes.len() - needle.len();
    let mut pos = 0;
    while pos <= last_start {
        let end = pos + needle.len();
        if !bytes[pos..end].eq_ignore_ascii_case(needle) {
            pos += 1;
            continue;
        }

        match match_at(bytes, pos, end) {
            Some(start) => {
                push_match(
                    out,
                    Match {
                        source: text,
                        full_span: start..end,
                        subdomain_span: start..pos - 1,
                        suffix,
                    },
                )?;
                pos = end;
            }
            None => pos += 1,
        }
    }

    Ok(())
}

/// Check the text around a suffix occurrence at `pos..end`.
///
/// Returns the subdomain start when every structural and boundary rule holds.
fn match_at(bytes: &[u8], pos: usize, end: usize) -> Option<usize> {
    // A dot must separate subdomain and suffix.
    if pos == 0 || bytes[pos - 1] != b'.' {
        return None;
    }
    let dot = pos - 1;

    let start = subdomain_start(bytes, dot)?;

    if start > 0 && is_subdomain_char(bytes[start - 1]) {
        return None;
    }
    // A following dot would make this a label of some longer domain.
    if let Some(&after) = bytes.get(end) {
        if is_subdomain_char(after) || after == b'.' {
            return None;
        }
    }

    Some(start)
}

/// Walk back from the dot over subdomain characters and validate the label.
fn subdomain_start(bytes: &[u8], dot: usize) -> Option<usize> {
    let start = bytes[..dot]
        .iter()
        .rposition(|&c| !is_subdomain_char(c))
        .map_or(0, |i| i + 1);

    let label = &bytes[start..dot];
    if label.len() < MIN_SUBDOMAIN_CHARS {
        return None;
    }
    let (preamble, nonce) = label.split_at(PREAMBLE_CHARS);
    if !preamble.iter().all(|&c| is_base32hex_char(c)) {
        return None;
    }
    // Looser than the standalone validator: separators are allowed in the nonce.
    if !nonce
        .iter()
        .all(|&c| is_zbase32_char(c) || c == b'-' || c == b'_')
    {
        return None;
    }

    Some(start)
}

fn push_match<'a>(out: &mut Vec<Match<'a>>, m: Match<'a>) -> Result<()> {
    if out.len() == out.capacity() {
        let additional = out.capacity().max(INITIAL_CAPACITY);
        out.try_reserve(additional).map_err(|_| OastError::OutOfMemory)?;
    }
    tracing::trace!(domain = %m, start = m.start(), suffix = m.suffix, "OAST match");
    out.push(m);
    Ok(())
}
