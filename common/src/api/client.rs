use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{
    ApiResponse, Balance, ProcessRequest, ProcessResponse, PublicKeyData, TransactionData,
    GET_BALANCE_PATH, GET_PUBLIC_KEY_PATH, GET_TRANSACTION_PATH, PROCESS_CHAT_PATH,
    PROCESS_TRANSACTION_PATH,
};
use crate::{
    crypto::Address,
    transaction::{ChatTransaction, ProcessedTransaction},
};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    // Offline or unknown nodes answer with a bare 500
    #[error("Node {url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("Node rejected the request: {0}")]
    Api(String),
}

/// HTTP client bound to a single mock node URL.
#[derive(Debug, Clone)]
pub struct NodeClient {
    http: Client,
    url: String,
}

impl NodeClient {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client<S: Into<String>>(http: Client, url: S) -> Self {
        Self {
            http,
            url: url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse<T>, ClientError> {
        let url = format!("{}{}", self.url, path);
        debug!("GET {} {:?}", url, params);

        let response = self.http.get(&url).query(params).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status {
                url,
                status: response.status(),
            });
        }

        Ok(response.json().await?)
    }

    async fn post(
        &self,
        path: &str,
        transaction: &ChatTransaction,
    ) -> Result<ProcessedTransaction, ClientError> {
        let url = format!("{}{}", self.url, path);
        debug!("POST {} for transaction to {}", url, transaction.recipient_id);

        let response = self
            .http
            .post(&url)
            .json(&ProcessRequest {
                transaction: transaction.clone(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                url,
                status: response.status(),
            });
        }

        let body: ProcessResponse = response.json().await?;
        Ok(body.transaction)
    }

    /// Public key of `address`, `None` when the node does not know the account.
    pub async fn get_public_key(&self, address: &Address) -> Result<Option<String>, ClientError> {
        let address = address.to_string();
        let response: ApiResponse<PublicKeyData> = self
            .query(GET_PUBLIC_KEY_PATH, &[("address", address.as_str())])
            .await?;

        Ok(response.data.map(|data| data.public_key))
    }

    pub async fn get_balance(&self, address: &Address) -> Result<Balance, ClientError> {
        let address = address.to_string();
        let response: ApiResponse<Balance> = self
            .query(GET_BALANCE_PATH, &[("address", address.as_str())])
            .await?;

        match response.data {
            Some(balance) if response.success => Ok(balance),
            _ => Err(ClientError::Api(response.error.unwrap_or_default())),
        }
    }

    pub async fn get_transaction(
        &self,
        id: &str,
    ) -> Result<Option<ProcessedTransaction>, ClientError> {
        let response: ApiResponse<TransactionData> =
            self.query(GET_TRANSACTION_PATH, &[("id", id)]).await?;

        Ok(response.data.map(|data| data.transaction))
    }

    /// Submit through the public transactions endpoint, as bots do.
    pub async fn process_transaction(
        &self,
        transaction: &ChatTransaction,
    ) -> Result<ProcessedTransaction, ClientError> {
        self.post(PROCESS_TRANSACTION_PATH, transaction).await
    }

    /// Submit through the internal chats endpoint, as simulated users do.
    pub async fn process_chat(
        &self,
        transaction: &ChatTransaction,
    ) -> Result<ProcessedTransaction, ClientError> {
        self.post(PROCESS_CHAT_PATH, transaction).await
    }
}
