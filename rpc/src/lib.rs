//! JSON-RPC client for the blockchain node.
//!
//! [`NodeRpcClient`] implements [`vsp_chain::NodeQuery`] against dcrd:
//! - `getbestblockheader` for height and stake difficulty
//! - `getrawtransaction <hash> 1` for ticket lookup
//! - `existsliveticket <hash>` for the liveness of mature tickets

pub mod client;
pub mod error;
pub mod types;

pub use client::{NodeRpcClient, NodeRpcConfig};
pub use error::RpcError;
