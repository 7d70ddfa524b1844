//! LMDB implementation of AddressIndexStore plus schema bookkeeping.

use vsp_store::{AddressIndexStore, StoreError};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

const LAST_ADDRESS_INDEX_KEY: &[u8] = b"last_address_index";
const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

fn decode_u32(key: &[u8], bytes: &[u8]) -> Result<u32, LmdbError> {
    let arr: [u8; 4] = bytes.try_into().map_err(|_| {
        LmdbError::Serialization(format!(
            "{} has unexpected byte length {}",
            String::from_utf8_lossy(key),
            bytes.len()
        ))
    })?;
    Ok(u32::from_le_bytes(arr))
}

impl LmdbEnvironment {
    fn get_u32(&self, key: &[u8]) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.meta_db.get(&rtxn, key)? {
            Some(bytes) => decode_u32(key, bytes),
            None => Ok(0),
        }
    }

    fn put_u32(&self, key: &[u8], value: u32) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        self.meta_db.put(&mut wtxn, key, &value.to_le_bytes())?;
        wtxn.commit()?;
        Ok(())
    }

    /// Stored schema version, 0 for a fresh database.
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        self.get_u32(SCHEMA_VERSION_KEY)
    }

    pub fn set_schema_version(&self, version: u32) -> Result<(), LmdbError> {
        self.put_u32(SCHEMA_VERSION_KEY, version)
    }
}

impl AddressIndexStore for LmdbEnvironment {
    fn get_last_address_index(&self) -> Result<u32, StoreError> {
        Ok(self.get_u32(LAST_ADDRESS_INDEX_KEY)?)
    }

    fn set_last_address_index(&self, index: u32) -> Result<(), StoreError> {
        Ok(self.put_u32(LAST_ADDRESS_INDEX_KEY, index)?)
    }
}
