//! JSON-RPC Server
//!
//! Serves the queue operations over TCP on localhost only; the admin UI and
//! display boards sit behind the same host.

use crate::handler::RpcHandler;
use crate::types::{
    CreateRequest, DeleteRequest, ListTransfersRequest, SnapshotRequest, TransferRequest,
    UpdateStatusRequest,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use medq_core::application::QueueSettings;
use medq_core::port::{
    AuditSink, DirectoryStore, IdProvider, QueueRepository, TimeProvider,
    TransactionalQueueRepository,
};
use std::sync::Arc;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9533;

/// RPC Server Configuration
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: RpcServerConfig,
        tx_repo: Arc<dyn TransactionalQueueRepository>,
        repo: Arc<dyn QueueRepository>,
        directory: Arc<dyn DirectoryStore>,
        audit: Arc<dyn AuditSink>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        settings: QueueSettings,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(
                tx_repo,
                repo,
                directory,
                audit,
                id_provider,
                time_provider,
                settings,
            )),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Security: Only binds to 127.0.0.1 by default (no external access)
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let mut module = RpcModule::new(());

        // Register methods
        let handler = self.handler.clone();
        module
            .register_async_method("queue.create.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: CreateRequest = params.parse()?;
                    handler.create(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.update_status.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: UpdateStatusRequest = params.parse()?;
                    handler.update_status(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.transfer.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: TransferRequest = params.parse()?;
                    handler.transfer(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.transfers.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: ListTransfersRequest = params.parse()?;
                    handler.list_transfers(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.snapshot.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: SnapshotRequest = params.parse().unwrap_or(SnapshotRequest {
                        date: None,
                    });
                    handler.snapshot(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.delete.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: DeleteRequest = params.parse()?;
                    handler.delete(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        info!("JSON-RPC server started successfully");

        let handle = server.start(module);
        Ok(handle)
    }
}
