//! Resources domain module.
//!
//! This module owns the single entity the server manages. Resources are
//! kept in process memory for the lifetime of the server and are never
//! persisted.
//!
//! ## Architecture
//!
//! - `model.rs` - the `Resource` entity, `Status` and creation input
//! - `patch.rs` - presence-aware partial updates
//! - `id.rs` - id generators
//! - `store.rs` - `ResourceStore`, the owner of all records
//! - `error.rs` - resource-specific error types

mod error;
mod id;
mod model;
mod patch;
mod store;

pub use error::{ResourceError, ResourceResult};
pub use id::{IdGenerator, IdStrategy, SequentialGenerator, UuidGenerator};
pub use model::{NewResource, Resource, Status};
pub use patch::ResourcePatch;
pub use store::ResourceStore;
