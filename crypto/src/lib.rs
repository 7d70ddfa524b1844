//! Cryptographic primitives for the VSP.
//!
//! - **Ed25519** child keys derived from a single fee seed via HMAC-SHA512
//! - **Blake2b** checksums for fee address encoding

pub mod address;
pub mod derivation;
pub mod error;

pub use address::{decode_fee_address, encode_fee_address, validate_fee_address};
pub use derivation::{AddressDeriver, FeeKeyChain, FeeSeed, HARDENED_KEY_START};
pub use error::CryptoError;
