//! Known OAST provider suffixes.
//!
//! We intentionally keep this a small, static list. Order matters: it is the
//! scan priority used by the extractor and the first structural match wins here.

/// Domain suffixes operated by OAST providers, in priority order.
pub const KNOWN_SUFFIXES: &[&str] = &[
    "oast.pro",
    "oast.live",
    "oast.site",
    "oast.online",
    "oast.fun",
    "oast.me",
    "interact.sh",
    "interactsh.com",
];

/// Return the first known suffix that `text` ends with (case-insensitive).
///
/// The suffix must either be the whole string or be preceded by a literal `.`,
/// so `evil-oast.pro` does not match `oast.pro`.
pub fn match_known_suffix(text: &str) -> Option<&'static str> {
    let bytes = text.as_bytes();
    KNOWN_SUFFIXES.iter().copied().find(|suffix| {
        if bytes.len() < suffix.len() {
            return false;
        }
        let start = bytes.len() - suffix.len();
        bytes[start..].eq_ignore_ascii_case(suffix.as_bytes())
            && (start == 0 || bytes[start - 1] == b'.')
    })
}

/// Split off the subdomain in front of a known suffix and its separating dot.
///
/// Returns `None` if no known suffix matches or nothing precedes it.
pub fn split_subdomain(text: &str) -> Option<&str> {
    let suffix = match_known_suffix(text)?;
    if text.len() == suffix.len() {
        return None;
    }
    // The byte before the suffix is the ASCII dot checked by `match_known_suffix`.
    let subdomain = &text[..text.len() - suffix.len() - 1];
    if subdomain.is_empty() {
        None
    } else {
        Some(subdomain)
    }
}
