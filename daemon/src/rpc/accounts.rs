use std::sync::Arc;

use actix_web::{
    web::{self, Json, ReqData},
    Responder,
};

use chatnet_common::{
    api::{missing_property_error, ApiResponse, Balance, PublicKeyData},
    crypto::Address,
};

use super::{
    error::ApiError,
    utils::{require_properties, QueryParams},
    MockNode,
};

const ACCOUNT_NOT_FOUND: &str = "Account not found";

pub async fn get_public_key(
    node: ReqData<Arc<MockNode>>,
    query: web::Query<QueryParams>,
) -> Result<impl Responder, ApiError> {
    if let Err(name) = require_properties(&query, &["address"]) {
        return Ok(Json(ApiResponse::<PublicKeyData>::error(
            node.advance_timestamp(),
            missing_property_error(name),
        )));
    }

    let public_key = query["address"]
        .parse::<Address>()
        .map(|address| node.get_public_key(&address))
        .unwrap_or_default();

    let timestamp = node.advance_timestamp();
    let response = if public_key.is_empty() {
        ApiResponse::error(timestamp, ACCOUNT_NOT_FOUND)
    } else {
        ApiResponse::ok(timestamp, PublicKeyData { public_key })
    };

    Ok(Json(response))
}

pub async fn get_balance(
    node: ReqData<Arc<MockNode>>,
    query: web::Query<QueryParams>,
) -> Result<impl Responder, ApiError> {
    if let Err(name) = require_properties(&query, &["address"]) {
        return Ok(Json(ApiResponse::<Balance>::error(
            node.advance_timestamp(),
            missing_property_error(name),
        )));
    }

    // unknown accounts have nothing on them
    let balance = query["address"]
        .parse::<Address>()
        .ok()
        .and_then(|address| node.get_account(&address))
        .and_then(|account| account.balance)
        .unwrap_or_else(Balance::zero);

    Ok(Json(ApiResponse::ok(node.advance_timestamp(), balance)))
}
