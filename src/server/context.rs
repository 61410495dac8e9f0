//! Server context - shared state for request handlers

use std::sync::Arc;

use serde_json::json;

use crate::api::ChirpService;
use crate::ipc::messages::{ChirpRequest, ChirpResponse, Methods, ResponseError};
use crate::ipc::server::RequestHandler;
use crate::metrics::HitCounter;
use crate::server::handlers;
use crate::storage::{ChirpRepository, ChirpStore};

/// Shared context for all request handlers
pub struct ServerContext<R: ChirpRepository = ChirpStore> {
    /// Validating façade over the store
    pub service: ChirpService<R>,
    /// Count of chirp requests served
    pub hits: HitCounter,
}

impl<R: ChirpRepository> ServerContext<R> {
    pub fn new(service: ChirpService<R>) -> Self {
        Self {
            service,
            hits: HitCounter::new(),
        }
    }

    /// Convenience constructor from a bare repository with default limits.
    pub fn from_repository(repo: Arc<R>) -> Self {
        Self::new(ChirpService::new(repo))
    }

    /// Route a request to its handler.
    pub fn dispatch(&self, request: ChirpRequest) -> ChirpResponse {
        let ChirpRequest { id, method, params } = request;

        if method.starts_with("chirps.") {
            self.hits.increment();
        }

        match method.as_str() {
            Methods::HEALTH => ChirpResponse::success(id, json!({"status": "ok"})),
            Methods::CHIRPS_CREATE => handlers::handle_chirp_create(id, &params, self),
            Methods::CHIRPS_LIST => handlers::handle_chirp_list(id, self),
            Methods::CHIRPS_GET => handlers::handle_chirp_get(id, &params, self),
            Methods::CHIRPS_VALIDATE => handlers::handle_chirp_validate(id, &params, self),
            Methods::USERS_CREATE => handlers::handle_user_create(id, &params, self),
            Methods::METRICS_READ => handlers::handle_metrics_read(id, self),
            Methods::METRICS_RESET => handlers::handle_metrics_reset(id, self),
            other => ChirpResponse::error(id, ResponseError::method_not_found(other)),
        }
    }
}

/// Dispatch runs to completion before the future is returned, so store
/// calls block the connection's tokio worker for the length of one file
/// read or write. The store uses a std `RwLock` and never holds it across
/// an `.await`.
impl<R: ChirpRepository> RequestHandler for ServerContext<R> {
    fn handle(&self, request: ChirpRequest) -> impl std::future::Future<Output = ChirpResponse> + Send {
        let response = self.dispatch(request);
        async move { response }
    }
}
