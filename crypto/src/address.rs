//! Fee address encoding.
//!
//! Address format: `prefix` + base32(public_key, 52 chars) + base32(checksum, 8 chars)
//!
//! Checksum: first 5 bytes of Blake2b-256(prefix ++ public_key), so an address
//! encoded for one network never validates on another.
//! Base32 alphabet: `13456789abcdefghijkmnopqrstuwxyz` (avoids ambiguous chars).

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use vsp_types::FeeAddress;

type Blake2b256 = Blake2b<U32>;

const BASE32_ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Number of base32 characters for the public key (256 bits → 52).
const PUBKEY_CHARS: usize = 52;
/// 52 pubkey + 8 checksum.
const ENCODED_LEN: usize = 60;

fn encode_base32(bytes: &[u8]) -> String {
    let num_chars = (bytes.len() * 8).div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos < N {
                result[pos] = (buffer >> bits_in_buffer) as u8;
                pos += 1;
            }
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

fn checksum(prefix: &str, public_key: &[u8; 32]) -> [u8; 5] {
    let hash = Blake2b256::new()
        .chain_update(prefix.as_bytes())
        .chain_update(public_key)
        .finalize();
    let mut out = [0u8; 5];
    out.copy_from_slice(&hash[..5]);
    out
}

/// Encode a public key as a fee address for the network with `prefix`.
pub fn encode_fee_address(prefix: &str, public_key: &[u8; 32]) -> FeeAddress {
    let pubkey_encoded = encode_base32(public_key);
    let checksum_encoded = encode_base32(&checksum(prefix, public_key));
    FeeAddress::new(format!("{prefix}{pubkey_encoded}{checksum_encoded}"))
}

/// Extract the public key from a fee address.
///
/// Returns `None` if the prefix, length or checksum is wrong.
pub fn decode_fee_address(prefix: &str, address: &str) -> Option<[u8; 32]> {
    let encoded = address.strip_prefix(prefix)?;
    if !encoded.is_ascii() || encoded.len() != ENCODED_LEN {
        return None;
    }

    let pubkey: [u8; 32] = decode_base32_fixed(&encoded[..PUBKEY_CHARS])?;
    let check: [u8; 5] = decode_base32_fixed(&encoded[PUBKEY_CHARS..])?;
    if check != checksum(prefix, &pubkey) {
        return None;
    }
    Some(pubkey)
}

pub fn validate_fee_address(prefix: &str, address: &str) -> bool {
    decode_fee_address(prefix, address).is_some()
}
