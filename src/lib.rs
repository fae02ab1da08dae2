//! oast-decode - recognize, validate and decode OAST callback domains
//!
//! OAST services (interactsh, `oast.*`) hand out subdomains whose first 20
//! characters are a base32hex preamble carrying an issue timestamp, machine id,
//! pid and counter, followed by a z-base-32 nonce. This crate finds such domains
//! in free text, checks their structure and decodes the preamble.
//!
//! ```
//! let text = "lookup bst1o05anf609kg004m0ybndrfg8ejkmc.oast.pro from 10.0.0.7";
//! let found = oast_decode::extract_domains(text).unwrap();
//! assert_eq!(found, vec!["bst1o05anf609kg004m0ybndrfg8ejkmc.oast.pro"]);
//!
//! assert!(oast_decode::validate(found[0]));
//! let decoded = oast_decode::decode(found[0]);
//! assert_eq!(decoded.pid, 1234);
//! ```

pub mod base32;
pub mod decode;
pub mod domain;
pub mod error;
pub mod extract;
pub mod types;

// Re-export commonly used types
pub use error::{OastError, Result};
pub use types::{CliConfig, DecodedPreamble, MachineId, OutputFormat};

// Re-export main functionality
pub use base32::{decode_base32hex, encode_base32hex, is_base32hex_char, is_zbase32_char};
pub use decode::{decode, extract_and_decode};
pub use domain::{
    is_valid_preamble, is_valid_subdomain, match_known_suffix, split_subdomain, KNOWN_SUFFIXES,
};
pub use extract::{extract, extract_domains, Match};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate a full OAST domain (known suffix + well-formed subdomain).
pub fn validate(text: &str) -> bool {
    domain::validate_domain(text)
}

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
