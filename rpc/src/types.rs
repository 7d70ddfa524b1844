//! JSON-RPC 1.0 wire types and the subset of dcrd results the VSP reads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: serde_json::Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "1.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

// ── getbestblockheader ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BestBlockHeaderResult {
    pub height: i64,
    /// Stake difficulty in coins.
    pub sbits: f64,
}

// ── getrawtransaction (verbose) ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RawTransactionResult {
    pub hex: String,
    #[serde(default)]
    pub confirmations: i64,
    #[serde(default)]
    pub vout: Vec<Vout>,
}

#[derive(Debug, Deserialize)]
pub struct Vout {
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

#[derive(Debug, Deserialize)]
pub struct ScriptPubKey {
    #[serde(rename = "type", default)]
    pub script_type: String,
    #[serde(default)]
    pub addresses: Vec<String>,
}

pub const SCRIPT_STAKE_SUBMISSION: &str = "stakesubmission";
pub const SCRIPT_TICKET_COMMITMENT: &str = "sstxcommitment";

impl RawTransactionResult {
    /// The first output pays to a ticket submission script.
    pub fn is_ticket(&self) -> bool {
        self.vout
            .first()
            .is_some_and(|o| o.script_pub_key.script_type == SCRIPT_STAKE_SUBMISSION)
    }

    /// Address of the first commitment output.
    pub fn commitment_address(&self) -> Option<String> {
        let out = self.vout.get(1)?;
        if out.script_pub_key.script_type != SCRIPT_TICKET_COMMITMENT {
            return None;
        }
        out.script_pub_key.addresses.first().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKET_JSON: &str = r#"{
        "hex": "0100",
        "txid": "ab",
        "confirmations": 12,
        "vout": [
            {"value": 1.0, "n": 0, "scriptPubKey": {"type": "stakesubmission", "addresses": ["Ssvoter"]}},
            {"value": 0.0, "n": 1, "scriptPubKey": {"type": "sstxcommitment", "addresses": ["Sscommit"], "commitamt": 1.0}},
            {"value": 0.0, "n": 2, "scriptPubKey": {"type": "sstxchange", "addresses": ["Sschange"]}}
        ]
    }"#;

    #[test]
    fn parses_ticket_outputs() {
        let tx: RawTransactionResult = serde_json::from_str(TICKET_JSON).unwrap();
        assert!(tx.is_ticket());
        assert_eq!(tx.confirmations, 12);
        assert_eq!(tx.commitment_address().as_deref(), Some("Sscommit"));
    }

    #[test]
    fn regular_transaction_is_not_a_ticket() {
        let tx: RawTransactionResult = serde_json::from_str(
            r#"{"hex": "00", "vout": [{"scriptPubKey": {"type": "pubkeyhash", "addresses": ["Ssx"]}}]}"#,
        )
        .unwrap();
        assert!(!tx.is_ticket());
        assert_eq!(tx.commitment_address(), None);
        assert_eq!(tx.confirmations, 0);
    }

    #[test]
    fn request_is_json_rpc_1() {
        let req = JsonRpcRequest::new(3, "existsliveticket", serde_json::json!(["ab"]));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "1.0");
        assert_eq!(json["method"], "existsliveticket");
        assert_eq!(json["params"][0], "ab");
    }
}
