//! Crude Server Library
//!
//! A minimal resource-management service: create, read, update, delete and
//! list a single resource type held in process memory.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the server handle and the HTTP transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **resources**: The `Resource` entity and the `ResourceStore` that owns it
//!
//! # Example
//!
//! ```rust
//! use crude_server::domains::resources::{NewResource, ResourcePatch, ResourceStore, Status};
//!
//! let store = ResourceStore::new();
//! let alpha = store.create(NewResource::new("Alpha", "d").with_status("active")).unwrap();
//!
//! let updated = store
//!     .update(&alpha.id, ResourcePatch::default().status("inactive"))
//!     .unwrap();
//! assert_eq!(updated.status, Status::Inactive);
//! assert!(store.list(Some(Status::Active)).is_empty());
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, ResourceServer, Result};
