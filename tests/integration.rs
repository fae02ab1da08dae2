//! Integration tests for oast-decode

use oast_decode::{
    base32::{BASE32HEX_ALPHABET, ZBASE32_ALPHABET},
    decode, decode_base32hex, encode_base32hex, extract, extract_and_decode, extract_domains,
    is_valid_preamble, is_valid_subdomain, validate, MachineId, OastError, KNOWN_SUFFIXES,
};
use rand::Rng;

const PREAMBLE: &str = "bst1o05anf609kg004m0";
const NONCE: &str = "ybndrfg8ejkmc";

fn random_from(alphabet: &[u8; 32], len: usize, rng: &mut impl Rng) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

#[test]
fn test_concrete_preamble_scenario() {
    let bytes = [0x5F, 0x3A, 0x1C, 0x00, 0xAA, 0xBB, 0xCC, 0x04, 0xD2, 0x00, 0x01, 0x2C];
    let preamble = encode_base32hex(&bytes);
    assert_eq!(preamble, PREAMBLE);

    let decoded = decode(&preamble);
    assert!(decoded.valid);
    assert_eq!(decoded.timestamp, 0x5F3A1C00);
    assert_eq!(decoded.machine_id, MachineId([0xaa, 0xbb, 0xcc]));
    assert_eq!(decoded.machine_id.to_string(), "aa:bb:cc");
    assert_eq!(decoded.pid, 1234);
    assert_eq!(decoded.counter, 300);
}

#[test]
fn test_random_round_trip() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let bytes: [u8; 12] = rng.gen();
        let preamble = encode_base32hex(&bytes);
        assert_eq!(preamble.len(), 20);
        assert!(is_valid_preamble(&preamble));

        let decoded = decode_base32hex(&preamble).unwrap();
        assert_eq!(decoded, bytes);
        assert_eq!(encode_base32hex(&decoded), preamble);
    }
}

#[test]
fn test_random_preambles_always_decode() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let preamble = random_from(BASE32HEX_ALPHABET, 20, &mut rng);
        let first = decode_base32hex(&preamble).unwrap();
        // decoding is a pure function of the input
        assert_eq!(decode_base32hex(&preamble.to_uppercase()).unwrap(), first);
        // re-encoding only loses the 4 discarded trailing bits
        let reencoded = encode_base32hex(&first);
        assert_eq!(reencoded[..19], preamble[..19]);
        assert_eq!(decode_base32hex(&reencoded).unwrap(), first);
    }
}

#[test]
fn test_decode_base32hex_length_property() {
    for len in (0..40).filter(|&n| n != 20) {
        let input = "0".repeat(len);
        assert_eq!(
            decode_base32hex(&input),
            Err(OastError::InvalidLength { actual: len })
        );
    }
}

#[test]
fn test_decode_base32hex_character_property() {
    for bad in ['w', 'x', 'y', 'z', 'W', '-', '.', ' ', '_'] {
        for position in [0usize, 7, 19] {
            let mut input: Vec<char> = PREAMBLE.chars().collect();
            input[position] = bad;
            let input: String = input.into_iter().collect();
            assert!(matches!(
                decode_base32hex(&input),
                Err(OastError::InvalidCharacter { .. })
            ));
        }
    }
}

#[test]
fn test_subdomain_property() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let nonce_len = rng.gen_range(0..40);
        let subdomain = format!(
            "{}{}",
            random_from(BASE32HEX_ALPHABET, 20, &mut rng),
            random_from(ZBASE32_ALPHABET, nonce_len, &mut rng)
        );
        assert_eq!(is_valid_subdomain(&subdomain), nonce_len >= 13);
    }
}

#[test]
fn test_validate_every_suffix() {
    for suffix in KNOWN_SUFFIXES {
        let domain = format!("{PREAMBLE}{NONCE}.{suffix}");
        assert!(validate(&domain), "{domain}");
        assert!(validate(&domain.to_uppercase()), "{domain}");
        assert!(!validate(suffix));
        assert!(!validate(&format!("anything.{suffix}")));
    }
}

#[test]
fn test_extract_every_suffix() {
    let text: String = KNOWN_SUFFIXES
        .iter()
        .map(|suffix| format!("hit {PREAMBLE}{NONCE}.{suffix};\n"))
        .collect();
    let matches = extract(&text).unwrap();
    assert_eq!(matches.len(), KNOWN_SUFFIXES.len());
    for (m, suffix) in matches.iter().zip(KNOWN_SUFFIXES) {
        assert_eq!(m.suffix, *suffix);
        assert_eq!(m.subdomain(), format!("{PREAMBLE}{NONCE}"));
        assert!(validate(m.as_str()));
    }
}

#[test]
fn test_extract_boundaries() {
    let sub = format!("{PREAMBLE}{NONCE}");
    assert!(extract_domains(&format!("{sub}xoast.pro")).unwrap().is_empty());
    assert!(extract_domains(&format!("{sub}.oast.pro.evil.com")).unwrap().is_empty());
    assert_eq!(
        extract_domains(&format!("\"{sub}.oast.pro\"")).unwrap(),
        vec![format!("{sub}.oast.pro")]
    );
}

#[test]
fn test_extract_never_overlaps_within_suffix() {
    let sub = format!("{PREAMBLE}{NONCE}");
    let text = format!("{sub}.oast.pro {sub}.oast.pro\n{sub}.OAST.PRO");
    let matches = extract(&text).unwrap();
    assert_eq!(matches.len(), 3);
    for pair in matches.windows(2) {
        assert!(pair[0].full_span.end <= pair[1].full_span.start);
    }
}

#[test]
fn test_extract_and_decode() {
    let text = format!(
        "dns query {PREAMBLE}{NONCE}.oast.fun A\nhttp host: {}{}.interact.sh",
        PREAMBLE.to_uppercase(),
        "YBNDRFG8EJKMCPQ"
    );
    let decoded = extract_and_decode(&text).unwrap();
    assert_eq!(decoded.len(), 2);

    assert_eq!(decoded[0].original, format!("{PREAMBLE}{NONCE}.oast.fun"));
    assert!(decoded[0].valid);
    assert_eq!(decoded[0].nonce, NONCE);

    assert!(decoded[1].original.ends_with(".interact.sh"));
    assert!(decoded[1].valid);
    assert_eq!(decoded[1].nonce, "ybndrfg8ejkmcpq");
    assert_eq!(decoded[1].pid, 1234);
}

#[test]
fn test_decode_error_contract() {
    let empty = decode("");
    assert!(!empty.valid);
    assert_eq!(empty.error.as_deref(), Some("empty input"));

    let short = decode("0123456789abcdefghi");
    assert!(!short.valid);
    let error = short.error.as_deref().unwrap();
    assert!(error.contains("19") && error.contains("20"));
    assert_eq!((short.timestamp, short.pid, short.counter), (0, 0, 0));
}

#[test]
fn test_decoded_json() {
    let decoded = decode(&format!("{PREAMBLE}{NONCE}.oast.pro"));
    let value: serde_json::Value = serde_json::from_str(&decoded.to_json().unwrap()).unwrap();
    assert_eq!(value["valid"], true);
    assert_eq!(value["ts"], 0x5F3A1C00u32);
    assert_eq!(value["machine_id"], "aa:bb:cc");
    assert_eq!(value["ksort"], "bst1o0");
    assert_eq!(value["campaign"], "5anf6");
    assert_eq!(value["nonce"], NONCE);
}

#[test]
fn test_concurrent_use() {
    let text = format!("{PREAMBLE}{NONCE}.oast.pro");
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let text = text.clone();
            std::thread::spawn(move || {
                (0..100).all(|_| validate(&text) && extract(&text).map(|m| m.len()) == Ok(1))
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_library_initialization() {
    let result = oast_decode::init();
    assert!(result.is_ok());
}
