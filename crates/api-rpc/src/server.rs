//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over HTTP.

use crate::error::ServerError;
use crate::handler::RpcHandler;
use crate::types::{
    AttachExecutionParams, CreateJobParams, GetJobParams, ListJobsParams, UpdateStatusParams,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use unarchive_core::application::unarchive::StatusCallback;
use unarchive_core::application::UnarchiveService;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9527;

/// RPC Server Configuration
#[derive(Debug, Clone)]
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

/// Registers one method whose params deserialize into `$params`
macro_rules! register {
    ($module:expr, $handler:expr, $name:literal, $params:ty, $method:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($name, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: $params = params.parse()?;
                    handler.$method(req).await
                }
            })
            .map_err(|e| ServerError::Register(e.to_string()))?;
    }};
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<UnarchiveService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Build the method table
    pub fn module(&self) -> Result<RpcModule<()>, ServerError> {
        let mut module = RpcModule::new(());

        register!(module, self.handler, "jobs.create.v1", CreateJobParams, create_job);
        register!(module, self.handler, "jobs.get.v1", GetJobParams, get_job);
        register!(module, self.handler, "jobs.list.v1", ListJobsParams, list_jobs);
        register!(
            module,
            self.handler,
            "jobs.update_status.v1",
            UpdateStatusParams,
            update_status
        );
        register!(
            module,
            self.handler,
            "jobs.attach_execution.v1",
            AttachExecutionParams,
            attach_execution
        );
        // Progress reports from the execution driving a job
        register!(module, self.handler, "jobs.callback.v1", StatusCallback, callback);

        Ok(module)
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address (useful with port 0) and the server handle.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let module = self.module()?;

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = server.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

        info!(addr = %local_addr, "JSON-RPC server started");

        Ok((local_addr, server.start(module)))
    }
}
