use std::sync::Arc;

use actix_web::{
    web::{self, Json, ReqData},
    Responder,
};
use log::debug;

use chatnet_common::api::{
    missing_property_error, ApiResponse, ProcessRequest, ProcessResponse, TransactionData,
};

use super::{
    error::ApiError,
    utils::{require_properties, QueryParams},
    MockNode,
};

const TRANSACTION_NOT_FOUND: &str = "Transaction not found";

pub async fn get_transaction(
    node: ReqData<Arc<MockNode>>,
    query: web::Query<QueryParams>,
) -> Result<impl Responder, ApiError> {
    if let Err(name) = require_properties(&query, &["id"]) {
        return Ok(Json(ApiResponse::<TransactionData>::error(
            node.advance_timestamp(),
            missing_property_error(name),
        )));
    }

    let response = match node.get_transaction(&query["id"]) {
        Some(transaction) => {
            ApiResponse::ok(node.advance_timestamp(), TransactionData { transaction })
        }
        None => ApiResponse::error(node.advance_timestamp(), TRANSACTION_NOT_FOUND),
    };

    Ok(Json(response))
}

/// Accept a signed transaction and answer with its processed form.
///
/// Serves both the public process endpoint used by bots and the internal
/// chat endpoint used by simulated users.
pub async fn process_transaction(
    node: ReqData<Arc<MockNode>>,
    request: Json<ProcessRequest>,
) -> Result<impl Responder, ApiError> {
    let ProcessRequest { transaction } = request.into_inner();

    if log::log_enabled!(log::Level::Debug) {
        debug!(
            "Node {} received transaction from {} to {}",
            node.id(),
            transaction.sender_id,
            transaction.recipient_id
        );
    }

    let transaction = node.process_chat_transaction(transaction);
    Ok(Json(ProcessResponse { transaction }))
}
