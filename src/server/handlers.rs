//! Request handlers
//!
//! Handles chirps.*, users.* and metrics.* methods by delegating to the context.

use log::error;
use serde_json::{Value, json};

use crate::error::ChirpyError;
use crate::ipc::messages::{ChirpResponse, ResponseError};
use crate::server::context::ServerContext;
use crate::storage::ChirpRepository;

fn failure(id: u64, err: &ChirpyError) -> ChirpResponse {
    if !err.is_client_error() {
        error!("Request {} failed: {}", id, err);
    }
    ChirpResponse::error(id, ResponseError::from(err))
}

fn to_result<T: serde::Serialize>(id: u64, value: &T) -> ChirpResponse {
    match serde_json::to_value(value) {
        Ok(value) => ChirpResponse::success(id, value),
        Err(e) => ChirpResponse::error(id, ResponseError::internal_error(e.to_string())),
    }
}

/// Handle chirps.create - validate and store a new chirp
pub fn handle_chirp_create<R: ChirpRepository>(id: u64, params: &Value, ctx: &ServerContext<R>) -> ChirpResponse {
    let body = match params["body"].as_str() {
        Some(b) => b,
        None => return ChirpResponse::error(id, ResponseError::invalid_params("Missing 'body' parameter")),
    };

    match ctx.service.create(body) {
        Ok(chirp) => to_result(id, &chirp),
        Err(e) => failure(id, &e),
    }
}

/// Handle chirps.list - all chirps ascending by id
pub fn handle_chirp_list<R: ChirpRepository>(id: u64, ctx: &ServerContext<R>) -> ChirpResponse {
    match ctx.service.list() {
        Ok(chirps) => to_result(id, &chirps),
        Err(e) => failure(id, &e),
    }
}

/// Handle chirps.get - a single chirp by id
pub fn handle_chirp_get<R: ChirpRepository>(id: u64, params: &Value, ctx: &ServerContext<R>) -> ChirpResponse {
    let chirp_id = match params["id"].as_u64() {
        Some(chirp_id) => chirp_id,
        None => return ChirpResponse::error(id, ResponseError::invalid_params("Missing 'id' parameter")),
    };

    match ctx.service.get(chirp_id) {
        Ok(chirp) => to_result(id, &chirp),
        Err(e) => failure(id, &e),
    }
}

/// Handle chirps.validate - check a body and return the cleaned text
pub fn handle_chirp_validate<R: ChirpRepository>(id: u64, params: &Value, ctx: &ServerContext<R>) -> ChirpResponse {
    let body = match params["body"].as_str() {
        Some(b) => b,
        None => return ChirpResponse::error(id, ResponseError::invalid_params("Missing 'body' parameter")),
    };

    match ctx.service.validate(body) {
        Ok(cleaned) => ChirpResponse::success(id, json!({"cleaned_body": cleaned})),
        Err(e) => failure(id, &e),
    }
}

/// Handle users.create - register a user by email
pub fn handle_user_create<R: ChirpRepository>(id: u64, params: &Value, ctx: &ServerContext<R>) -> ChirpResponse {
    let email = match params["email"].as_str() {
        Some(e) => e,
        None => return ChirpResponse::error(id, ResponseError::invalid_params("Missing 'email' parameter")),
    };

    match ctx.service.create_user(email) {
        Ok(user) => to_result(id, &user),
        Err(e) => failure(id, &e),
    }
}

/// Handle metrics.read
pub fn handle_metrics_read<R: ChirpRepository>(id: u64, ctx: &ServerContext<R>) -> ChirpResponse {
    ChirpResponse::success(id, json!({"hits": ctx.hits.read()}))
}

/// Handle metrics.reset
pub fn handle_metrics_reset<R: ChirpRepository>(id: u64, ctx: &ServerContext<R>) -> ChirpResponse {
    ctx.hits.reset();
    ChirpResponse::success(id, json!({"hits": 0}))
}
