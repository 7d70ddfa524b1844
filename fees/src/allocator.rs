//! Fee address allocation.
//!
//! The allocator owns the fee address cursor. It is read from storage once
//! at startup and then only advanced after the new value has been persisted,
//! so the in-memory cursor never runs ahead of storage.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use vsp_crypto::AddressDeriver;
use vsp_store::AddressIndexStore;
use vsp_types::FeeAddress;

use crate::error::FeeError;

/// Hands out each fee address index exactly once, in increasing order.
pub struct FeeAddressAllocator<S, D> {
    store: Arc<S>,
    deriver: Arc<D>,
    /// Last index persisted as issued. Held for the whole derive-and-persist step.
    cursor: Mutex<u32>,
}

impl<S: AddressIndexStore, D: AddressDeriver> FeeAddressAllocator<S, D> {
    /// Create an allocator starting from the persisted cursor.
    pub fn open(store: Arc<S>, deriver: Arc<D>) -> Result<Self, FeeError> {
        let last = store
            .get_last_address_index()
            .map_err(|e| FeeError::InternalError(format!("reading fee address index: {e}")))?;
        debug!(last_address_index = last, "fee address allocator opened");
        Ok(Self {
            store,
            deriver,
            cursor: Mutex::new(last),
        })
    }

    /// Last index handed out.
    pub async fn last_issued_index(&self) -> u32 {
        *self.cursor.lock().await
    }

    /// Derive the next fee address and persist its index.
    ///
    /// On any failure the cursor is left untouched, so the next call retries
    /// the same index.
    pub async fn allocate(&self) -> Result<(FeeAddress, u32), FeeError> {
        let mut cursor = self.cursor.lock().await;
        let index = cursor
            .checked_add(1)
            .ok_or_else(|| FeeError::InternalError("fee address index exhausted".to_string()))?;

        let address = self.deriver.derive(index).map_err(|e| {
            error!(fee_address_index = index, error = %e, "fee address derivation failed");
            FeeError::InternalError(format!("deriving fee address {index}: {e}"))
        })?;

        self.store.set_last_address_index(index).map_err(|e| {
            error!(fee_address_index = index, error = %e, "persisting fee address index failed");
            FeeError::AllocationPersistFailed(e)
        })?;

        *cursor = index;
        Ok((address, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsp_nullables::{NullDeriver, NullStore};

    fn allocator(store: Arc<NullStore>) -> (FeeAddressAllocator<NullStore, NullDeriver>, Arc<NullDeriver>) {
        let deriver = Arc::new(NullDeriver::new());
        let alloc = FeeAddressAllocator::open(store, Arc::clone(&deriver)).unwrap();
        (alloc, deriver)
    }

    #[tokio::test]
    async fn starts_after_persisted_cursor() {
        let store = Arc::new(NullStore::with_last_address_index(9));
        let (alloc, _) = allocator(Arc::clone(&store));
        let (address, index) = alloc.allocate().await.unwrap();
        assert_eq!(index, 10);
        assert_eq!(address, NullDeriver::address_for(10));
        assert_eq!(store.get_last_address_index().unwrap(), 10);
    }

    #[tokio::test]
    async fn persist_failure_retries_same_index() {
        let store = Arc::new(NullStore::new());
        let (alloc, _) = allocator(Arc::clone(&store));
        store.fail_next_set_index();

        let err = alloc.allocate().await.unwrap_err();
        assert!(matches!(err, FeeError::AllocationPersistFailed(_)));
        assert_eq!(alloc.last_issued_index().await, 0);

        let (_, index) = alloc.allocate().await.unwrap();
        assert_eq!(index, 1);
    }

    #[tokio::test]
    async fn derive_failure_does_not_advance() {
        let store = Arc::new(NullStore::new());
        let (alloc, deriver) = allocator(Arc::clone(&store));
        deriver.fail_next();

        let err = alloc.allocate().await.unwrap_err();
        assert!(matches!(err, FeeError::InternalError(_)));
        assert_eq!(store.writes(), 0);
        assert_eq!(alloc.allocate().await.unwrap().1, 1);
    }

    #[tokio::test]
    async fn exhausted_cursor_is_an_error() {
        let store = Arc::new(NullStore::with_last_address_index(u32::MAX));
        let (alloc, _) = allocator(store);
        assert!(matches!(
            alloc.allocate().await,
            Err(FeeError::InternalError(_))
        ));
    }
}
