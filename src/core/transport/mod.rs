//! Transport layer for the resource server.
//!
//! The server is exposed over HTTP (feature: `http`). The transport owns the
//! listener lifecycle and translates requests into resource store calls.

mod config;
mod error;
pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, router};
