//! OAST domain recognition: provider suffixes and subdomain structure

pub mod registry;
pub mod validator;

// Re-export main functionality
pub use registry::{match_known_suffix, split_subdomain, KNOWN_SUFFIXES};
pub use validator::{is_valid_preamble, is_valid_subdomain, validate_domain};

/// Characters that may appear in a subdomain label as seen by the extractor.
#[inline]
pub fn is_subdomain_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_'
}
