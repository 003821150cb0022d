use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Errors surfaced by the node outside of chain validation, which only
/// ever answers yes or no.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("request to peer {endpoint} failed: {source}")]
    Peer {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("peer {endpoint} answered with status {status}")]
    PeerStatus { endpoint: String, status: u16 },

    #[error("invalid transaction: {0}")]
    InvalidTransaction(&'static str),

    #[error("invalid endpoint: {0:?}")]
    InvalidEndpoint(String),

    #[error("mining task failed: {0}")]
    Mining(String),

    #[error("event bus closed")]
    EventBusClosed,

    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NodeError>;

impl ResponseError for NodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            NodeError::InvalidTransaction(_) | NodeError::InvalidEndpoint(_) => {
                StatusCode::BAD_REQUEST
            }
            NodeError::Peer { .. } | NodeError::PeerStatus { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
