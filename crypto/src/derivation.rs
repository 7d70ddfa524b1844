//! Deterministic fee-address derivation.
//!
//! Every fee address is a child of a single 32-byte fee seed:
//!
//! ```text
//! child_seed(i) = HMAC-SHA512(key = fee_seed, data = "vsp-fee" ++ i.to_be_bytes())[..32]
//! address(i)    = encode_fee_address(prefix, ed25519_public(child_seed(i)))
//! ```
//!
//! Only non-hardened indices (`i < 2^31`) are used so that the range matches
//! what wallets can scan for.

use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use vsp_types::FeeAddress;

use crate::address::encode_fee_address;
use crate::error::CryptoError;

type HmacSha512 = Hmac<Sha512>;

const DERIVATION_TAG: &[u8] = b"vsp-fee";

/// First hardened index; fee addresses stay strictly below it.
pub const HARDENED_KEY_START: u32 = 0x8000_0000;

/// Produces the fee address for a given index.
///
/// Implementations are pure: the same index always yields the same address.
/// Callers own the cursor of which index comes next.
pub trait AddressDeriver: Send + Sync {
    fn derive(&self, index: u32) -> Result<FeeAddress, CryptoError>;
}

/// The fee seed all fee addresses are derived from.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FeeSeed([u8; 32]);

impl FeeSeed {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a seed from 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes)
            .map_err(|e| CryptoError::InvalidSeed(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Draw a fresh seed from the operating system's random source.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::Random(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for FeeSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FeeSeed(..)")
    }
}

/// Derives fee addresses for one network from a [`FeeSeed`].
pub struct FeeKeyChain {
    seed: FeeSeed,
    prefix: String,
}

impl FeeKeyChain {
    pub fn new(seed: FeeSeed, prefix: impl Into<String>) -> Self {
        Self {
            seed,
            prefix: prefix.into(),
        }
    }

    fn child_public_key(&self, index: u32) -> Result<[u8; 32], CryptoError> {
        let mut mac = HmacSha512::new_from_slice(&self.seed.0)
            .map_err(|e| CryptoError::DerivationFailed(e.to_string()))?;
        mac.update(DERIVATION_TAG);
        mac.update(&index.to_be_bytes());
        let output = mac.finalize().into_bytes();

        let mut child_seed = [0u8; 32];
        child_seed.copy_from_slice(&output[..32]);
        let signing_key = SigningKey::from_bytes(&child_seed);
        child_seed.zeroize();
        Ok(signing_key.verifying_key().to_bytes())
    }
}

impl AddressDeriver for FeeKeyChain {
    fn derive(&self, index: u32) -> Result<FeeAddress, CryptoError> {
        if index >= HARDENED_KEY_START {
            return Err(CryptoError::IndexOutOfRange(index));
        }
        let public = self.child_public_key(index)?;
        Ok(encode_fee_address(&self.prefix, &public))
    }
}
