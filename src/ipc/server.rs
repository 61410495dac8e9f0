//! IPC Server - Unix socket server for chirp requests
//!
//! Provides:
//! - Unix stream socket listener
//! - One task per client connection
//! - Request routing and response sending

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;

use crate::error::{ChirpyError, Result};
use crate::ipc::messages::{ChirpRequest, ChirpResponse, ResponseError};

/// Socket location used when none is configured.
pub fn default_socket_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("chirpy.sock")
}

/// Configuration for the IPC server
#[derive(Debug, Clone)]
pub struct IpcServerConfig {
    /// Path to the Unix socket
    pub socket_path: PathBuf,
    /// Maximum number of concurrent clients
    pub max_clients: usize,
}

impl Default for IpcServerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            max_clients: 16,
        }
    }
}

impl IpcServerConfig {
    /// Create config with custom socket path
    pub fn with_socket_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.socket_path = path.as_ref().to_path_buf();
        self
    }

    /// Set max clients
    pub fn with_max_clients(mut self, max: usize) -> Self {
        self.max_clients = max;
        self
    }
}

/// Handler trait for processing requests
pub trait RequestHandler: Send + Sync {
    /// Handle a request and return a response
    fn handle(&self, request: ChirpRequest) -> impl std::future::Future<Output = ChirpResponse> + Send;
}

/// IPC Server for chirp requests
pub struct IpcServer {
    config: IpcServerConfig,
    /// Currently connected clients
    active_clients: Arc<AtomicUsize>,
    next_client_id: AtomicU64,
    shutdown: Notify,
}

impl IpcServer {
    /// Create a new IPC server with default config
    pub fn new() -> Self {
        Self::with_config(IpcServerConfig::default())
    }

    /// Create a new IPC server with custom config
    pub fn with_config(config: IpcServerConfig) -> Self {
        Self {
            config,
            active_clients: Arc::new(AtomicUsize::new(0)),
            next_client_id: AtomicU64::new(1),
            shutdown: Notify::new(),
        }
    }

    /// Get the socket path
    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Get count of connected clients
    pub fn client_count(&self) -> usize {
        self.active_clients.load(Ordering::SeqCst)
    }

    /// Run the server with a request handler until `shutdown` is called
    pub async fn run<H: RequestHandler + 'static>(&self, handler: Arc<H>) -> Result<()> {
        let socket_path = self.socket_path();

        // Remove a stale socket left by a previous run
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener =
            UnixListener::bind(socket_path).map_err(|e| ChirpyError::Ipc(format!("Failed to bind socket: {}", e)))?;
        info!("Listening on {}", socket_path.display());

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _addr)) => {
                            if self.client_count() >= self.config.max_clients {
                                warn!("Rejecting connection, {} clients connected", self.config.max_clients);
                                tokio::spawn(reject_client(stream));
                                continue;
                            }

                            let client_id = self.next_client_id.fetch_add(1, Ordering::SeqCst);
                            self.active_clients.fetch_add(1, Ordering::SeqCst);

                            let handler_clone = Arc::clone(&handler);
                            let active_clients = Arc::clone(&self.active_clients);

                            tokio::spawn(async move {
                                if let Err(e) = handle_client(stream, client_id, handler_clone).await {
                                    debug!("Client {} ended with error: {}", client_id, e);
                                }
                                active_clients.fetch_sub(1, Ordering::SeqCst);
                            });
                        }
                        Err(e) => {
                            warn!("Accept error: {}", e);
                        }
                    }
                }
                _ = self.shutdown.notified() => {
                    break;
                }
            }
        }

        let _ = std::fs::remove_file(socket_path);
        info!("Server stopped");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

impl Default for IpcServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tell an over-capacity client why it is being dropped
async fn reject_client(mut stream: UnixStream) {
    let response = ChirpResponse::error(0, ResponseError::internal_error("Server busy, try again later"));
    let result = async {
        let mut response_json = serde_json::to_vec(&response)?;
        response_json.push(b'\n');
        stream.write_all(&response_json).await?;
        stream.shutdown().await?;
        Ok::<(), ChirpyError>(())
    }
    .await;
    if let Err(e) = result {
        debug!("Failed to send busy reply: {}", e);
    }
}

/// Handle a single client connection
async fn handle_client<H: RequestHandler>(stream: UnixStream, client_id: u64, handler: Arc<H>) -> Result<()> {
    debug!("Client {} connected", client_id);
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break; // EOF - client disconnected
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ChirpRequest>(trimmed) {
            Ok(request) => handler.handle(request).await,
            Err(e) => ChirpResponse::error(0, ResponseError::parse_error(format!("Parse error: {}", e))),
        };

        let mut response_json = serde_json::to_vec(&response)?;
        response_json.push(b'\n');
        writer.write_all(&response_json).await?;
    }

    debug!("Client {} disconnected", client_id);
    Ok(())
}
