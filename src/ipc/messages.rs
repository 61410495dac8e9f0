//! IPC message types for client ↔ server communication.
//!
//! Uses JSON Lines (newline-delimited JSON) over Unix stream socket.
//! Message schema uses familiar field names (id, method, params, result, error)
//! but does NOT implement JSON-RPC 2.0 specification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChirpyError;

/// Request sent by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpRequest {
    /// Unique request ID for correlating responses.
    pub id: u64,
    /// Method name (e.g., "chirps.list", "metrics.read").
    pub method: String,
    /// Method parameters as JSON value.
    #[serde(default)]
    pub params: Value,
}

impl ChirpRequest {
    /// Create a new request with the given method and params.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Create a request with no parameters.
    pub fn no_params(id: u64, method: impl Into<String>) -> Self {
        Self::new(id, method, Value::Object(Default::default()))
    }
}

/// Response sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChirpResponse {
    /// Request ID this response corresponds to.
    pub id: u64,
    /// Result value on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl ChirpResponse {
    /// Create a success response.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: u64, error: ResponseError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Check if this response indicates success.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Error details in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
}

impl ResponseError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PARSE_ERROR, message)
    }

    /// Method not found error (-32601).
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Unknown method: {}", method.into()),
        )
    }

    /// Invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_PARAMS, message)
    }

    /// Internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, message)
    }
}

impl From<&ChirpyError> for ResponseError {
    fn from(err: &ChirpyError) -> Self {
        let code = match err {
            ChirpyError::Validation(_) => ErrorCode::VALIDATION_FAILED,
            ChirpyError::NotFound(_) => ErrorCode::CHIRP_NOT_FOUND,
            _ => ErrorCode::INTERNAL_ERROR,
        };
        Self::new(code, err.to_string())
    }
}

/// Standard error codes.
pub struct ErrorCode;

impl ErrorCode {
    /// Invalid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Storage or other server-side failure.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Chirp body rejected.
    pub const VALIDATION_FAILED: i32 = 1001;
    /// Chirp ID doesn't exist.
    pub const CHIRP_NOT_FOUND: i32 = 1002;
}

/// Known method names as constants.
pub struct Methods;

impl Methods {
    pub const HEALTH: &'static str = "health";

    // Chirps
    pub const CHIRPS_CREATE: &'static str = "chirps.create";
    pub const CHIRPS_LIST: &'static str = "chirps.list";
    pub const CHIRPS_GET: &'static str = "chirps.get";
    pub const CHIRPS_VALIDATE: &'static str = "chirps.validate";

    // Users
    pub const USERS_CREATE: &'static str = "users.create";

    // Metrics
    pub const METRICS_READ: &'static str = "metrics.read";
    pub const METRICS_RESET: &'static str = "metrics.reset";
}
