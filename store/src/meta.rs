//! Fee address cursor storage trait.

use crate::StoreError;

/// Persists the index of the most recently issued fee address.
///
/// The value stored here is authoritative across restarts; the allocator
/// seeds itself from it and only advances after a successful write.
pub trait AddressIndexStore: Send + Sync {
    /// Last issued fee address index, or 0 on a fresh database.
    fn get_last_address_index(&self) -> Result<u32, StoreError>;

    /// Durably record `index` as the last issued fee address index.
    fn set_last_address_index(&self, index: u32) -> Result<(), StoreError>;
}
