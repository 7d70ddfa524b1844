//! LMDB storage backend for the VSP.
//!
//! Implements the storage traits from `vsp-store` using the `heed` LMDB bindings.
//! Tickets and the fee address cursor live in one environment, so every
//! write is covered by LMDB's single-writer transactions.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod ticket;

pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
