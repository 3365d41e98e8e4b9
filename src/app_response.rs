use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::error::StoreError;

/// JSON envelope returned by every FFI call.
#[derive(Debug, Serialize, Deserialize)]
pub enum AppResponse {
    DatabaseError(String),
    SerializationError(String),
    NotFound(String),
    Conflict(String),
    InvalidState(String),
    Unauthorized(String),
    BadRequest(String),
    Ok(String),
}

impl Display for AppResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppResponse::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppResponse::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppResponse::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppResponse::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppResponse::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            AppResponse::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppResponse::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppResponse::Ok(msg) => write!(f, "Ok: {}", msg),
        }
    }
}

impl From<StoreError> for AppResponse {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppResponse::NotFound(msg),
            StoreError::Conflict(msg) => AppResponse::Conflict(msg),
            StoreError::InvalidState(msg) => AppResponse::InvalidState(msg),
            StoreError::NotAuthenticated => AppResponse::Unauthorized("Not authenticated".to_string()),
            StoreError::Storage(msg) => AppResponse::DatabaseError(msg),
            StoreError::Serialization(e) => AppResponse::SerializationError(format!("JSON serialization error: {}", e)),
        }
    }
}

impl From<SerdeError> for AppResponse {
    fn from(err: SerdeError) -> Self {
        AppResponse::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl AppResponse {
    /// Wraps a serializable payload as `Ok(json)`.
    pub fn success<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(json) => AppResponse::Ok(json),
            Err(e) => AppResponse::from(e),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AppResponse::Ok(_))
    }
}
