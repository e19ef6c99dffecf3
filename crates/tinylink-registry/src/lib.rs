//! Link registry service.
//!
//! [`LinkRegistry`] combines a link store with a code generator to allocate
//! short links, and passes lookups, removals and click accounting through to
//! the store. Core types are re-exported from `tinylink_core`.

pub mod service;

pub use service::{LinkRegistry, MAX_GENERATION_ATTEMPTS};
pub use tinylink_core::{AllocateParams, Link, Registry, RegistryError, ShortCode};
