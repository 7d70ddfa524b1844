//! HTTP JSON-RPC client for dcrd.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use vsp_chain::{ticket_window, BestBlockHeader, NodeError, NodeQuery, RawTicket, TicketWindow};
use vsp_types::{NetworkProfile, TicketHash};

use crate::error::{RpcError, ERR_NO_TX_INFO};
use crate::types::{BestBlockHeaderResult, JsonRpcRequest, JsonRpcResponse, RawTransactionResult};

/// Default timeout for node requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the node.
#[derive(Clone, Debug)]
pub struct NodeRpcConfig {
    pub url: String,
    pub user: String,
    pub pass: String,
    pub timeout: Duration,
}

impl NodeRpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: String::new(),
            pass: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = user.into();
        self.pass = pass.into();
        self
    }
}

/// Queries a dcrd node over JSON-RPC 1.0.
pub struct NodeRpcClient {
    http: reqwest::Client,
    config: NodeRpcConfig,
    next_id: AtomicU64,
}

impl NodeRpcClient {
    pub fn new(config: NodeRpcConfig) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| RpcError::Client(e.to_string()))?;
        Ok(Self {
            http,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Send a request and decode its `result` field.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut request = self
            .http
            .post(&self.config.url)
            .json(&JsonRpcRequest::new(id, method, params));
        if !self.config.user.is_empty() {
            request = request.basic_auth(&self.config.user, Some(&self.config.pass));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // dcrd reports RPC errors in the body, sometimes with a non-2xx status.
        let decoded: JsonRpcResponse = match serde_json::from_slice(&body) {
            Ok(decoded) => decoded,
            Err(_) if !status.is_success() => return Err(RpcError::Status(status.as_u16())),
            Err(e) => return Err(RpcError::InvalidResponse(e.to_string())),
        };

        if let Some(err) = decoded.error {
            debug!(method, code = err.code, message = %err.message, "node rpc error");
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }
        let result = decoded
            .result
            .ok_or_else(|| RpcError::InvalidResponse(format!("{method}: missing result")))?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))
    }

    pub async fn exists_live_ticket(&self, hash: &TicketHash) -> Result<bool, RpcError> {
        self.call("existsliveticket", serde_json::json!([hash.to_hex()]))
            .await
    }
}

impl NodeQuery for NodeRpcClient {
    async fn get_best_block_header(&self) -> Result<BestBlockHeader, NodeError> {
        let header: BestBlockHeaderResult =
            self.call("getbestblockheader", serde_json::json!([])).await?;
        Ok(BestBlockHeader {
            height: header.height,
            stake_difficulty: header.sbits,
        })
    }

    async fn get_raw_transaction(&self, hash: &TicketHash) -> Result<RawTicket, NodeError> {
        let result: Result<RawTransactionResult, RpcError> = self
            .call("getrawtransaction", serde_json::json!([hash.to_hex(), 1]))
            .await;
        let tx = match result {
            Ok(tx) => tx,
            Err(RpcError::Node { code, .. }) if code == ERR_NO_TX_INFO => {
                return Err(NodeError::TxNotFound(*hash))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(RawTicket {
            hash: *hash,
            is_ticket: tx.is_ticket(),
            commitment_address: tx.commitment_address(),
            confirmations: tx.confirmations,
            hex: tx.hex,
        })
    }

    async fn can_ticket_vote(
        &self,
        raw: &RawTicket,
        hash: &TicketHash,
        profile: &NetworkProfile,
    ) -> Result<bool, NodeError> {
        if !raw.is_ticket {
            return Ok(false);
        }
        match ticket_window(raw.confirmations, profile) {
            TicketWindow::Expired => Ok(false),
            TicketWindow::Immature => Ok(true),
            TicketWindow::Mature => Ok(self.exists_live_ticket(hash).await?),
        }
    }
}
