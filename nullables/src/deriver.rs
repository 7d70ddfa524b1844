//! Nullable address deriver: predictable addresses, scriptable failures.

use std::sync::atomic::{AtomicBool, Ordering};

use vsp_crypto::{AddressDeriver, CryptoError};
use vsp_types::FeeAddress;

/// Derives `"fee-<index>"` for every index.
pub struct NullDeriver {
    fail_next: AtomicBool,
}

impl NullDeriver {
    pub fn new() -> Self {
        Self {
            fail_next: AtomicBool::new(false),
        }
    }

    /// The address this deriver produces for `index`.
    pub fn address_for(index: u32) -> FeeAddress {
        FeeAddress::new(format!("fee-{index}"))
    }

    /// Make the next `derive` call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Default for NullDeriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressDeriver for NullDeriver {
    fn derive(&self, index: u32) -> Result<FeeAddress, CryptoError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CryptoError::DerivationFailed("injected failure".to_string()));
        }
        Ok(Self::address_for(index))
    }
}
