//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently has a single domain: the resources it stores.

pub mod resources;
