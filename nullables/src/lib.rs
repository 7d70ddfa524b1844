//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the fee issuer (clock, node, storage, key
//! derivation) sits behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including one-shot failures
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod deriver;
pub mod node;
pub mod store;

pub use clock::NullClock;
pub use deriver::NullDeriver;
pub use node::NullNode;
pub use store::NullStore;
