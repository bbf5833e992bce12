//! The hearth runtime: server loop and configuration.

mod config;
mod server;

pub use config::ServerConfig;
pub use server::{BoundServer, Server};
