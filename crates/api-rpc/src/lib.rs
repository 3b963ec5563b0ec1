//! JSON-RPC API Layer
//!
//! Exposes the unarchive job operations and the job-completion callback
//! over JSON-RPC 2.0.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
