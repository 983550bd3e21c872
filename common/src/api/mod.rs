// JSON types exchanged between clients and mock nodes
//
// Every query endpoint answers with an envelope carrying `success` and the
// node's `nodeTimestamp`, either with the payload fields flattened next to
// them or with an `error` message.

use serde::{Deserialize, Serialize};

use crate::transaction::{ChatTransaction, ProcessedTransaction};

#[cfg(feature = "rpc-client")]
mod client;

#[cfg(feature = "rpc-client")]
pub use client::*;

// Endpoint paths, relative to a node URL (`http://host:port/<node id>`)
pub const GET_PUBLIC_KEY_PATH: &str = "/api/accounts/getPublicKey";
pub const GET_BALANCE_PATH: &str = "/api/accounts/getBalance";
pub const GET_TRANSACTION_PATH: &str = "/api/transactions/get";
pub const PROCESS_TRANSACTION_PATH: &str = "/api/transactions/process";
pub const PROCESS_CHAT_PATH: &str = "/internal-api/chats/process";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub node_timestamp: u64,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(node_timestamp: u64, data: T) -> Self {
        Self {
            success: true,
            node_timestamp,
            data: Some(data),
            error: None,
        }
    }

    pub fn error<S: Into<String>>(node_timestamp: u64, error: S) -> Self {
        Self {
            success: false,
            node_timestamp,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyData {
    pub public_key: String,
}

/// Balance snapshot, amounts in atomic units encoded as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub balance: String,
    pub unconfirmed_balance: String,
}

impl Balance {
    pub fn new(balance: u64, unconfirmed_balance: u64) -> Self {
        Self {
            balance: balance.to_string(),
            unconfirmed_balance: unconfirmed_balance.to_string(),
        }
    }

    // Nodes report zero for accounts they don't know
    pub fn zero() -> Self {
        Self::new(0, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    pub transaction: ProcessedTransaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub transaction: ChatTransaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub transaction: ProcessedTransaction,
}

pub fn missing_property_error(property: &str) -> String {
    format!("Missing required property: {}", property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_is_flat() {
        let response = ApiResponse::ok(58_000_025, Balance::zero());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "success": true,
                "nodeTimestamp": 58_000_025u64,
                "balance": "0",
                "unconfirmedBalance": "0",
            })
        );
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse<PublicKeyData> =
            ApiResponse::error(1, missing_property_error("address"));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "success": false,
                "nodeTimestamp": 1,
                "error": "Missing required property: address",
            })
        );

        let parsed: ApiResponse<PublicKeyData> = serde_json::from_value(value).unwrap();
        assert!(parsed.data.is_none());
        assert_eq!(parsed.error.as_deref(), Some("Missing required property: address"));
    }

    #[test]
    fn test_public_key_envelope_parses() {
        let parsed: ApiResponse<PublicKeyData> = serde_json::from_value(json!({
            "success": true,
            "nodeTimestamp": 5,
            "publicKey": "abcd",
        }))
        .unwrap();

        assert_eq!(parsed.data.unwrap().public_key, "abcd");
    }
}
