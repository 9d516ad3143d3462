//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the resource
//! server: error handling, configuration, the server handle and, with the
//! `http` feature, the transport layer.

pub mod config;
pub mod error;
pub mod server;

#[cfg(feature = "http")]
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::ResourceServer;

#[cfg(feature = "http")]
pub use transport::{HttpConfig, HttpTransport};
