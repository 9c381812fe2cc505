//! Data models for servers, transfers, and configuration

pub mod config;
pub mod server;
pub mod transfer;

pub use config::Config;
pub use server::{Server, ServerLatency};
pub use transfer::TransferResult;
