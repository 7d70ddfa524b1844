//! Request and response bodies of the web API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v3/feeaddress`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAddressRequest {
    pub timestamp: i64,
    pub tickethash: String,
    pub tickethex: String,
    pub parenthex: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeeAddressResponse {
    pub timestamp: u64,
    pub feeaddress: String,
    /// Fee in atoms.
    pub feeamount: i64,
    pub expiration: u64,
    pub request: FeeAddressRequest,
}

/// Body of `GET /api/v3/vspinfo`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VspInfoResponse {
    pub apiversions: Vec<u32>,
    pub timestamp: u64,
    pub network: String,
    pub feepercentage: f64,
    pub vspclosed: bool,
    pub voteversion: u32,
    pub tickets: u64,
    pub lastaddressindex: u32,
    /// Human-readable fee expiration window.
    pub feeexpiration: String,
}
