use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    // Unknown and offline nodes are indistinguishable to callers
    #[error("node {0} is unavailable")]
    NodeUnavailable(String),
    #[error("no endpoint {path} on node {node}")]
    UnknownEndpoint { node: String, path: String },
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NodeUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnknownEndpoint { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).finish()
    }
}
