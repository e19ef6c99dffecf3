//! Core types and traits for the tinylink URL shortener.
//!
//! This crate provides the domain types shared by the stores, the
//! generator and the registry: [`ShortCode`], [`Link`], the store traits,
//! the [`Registry`] boundary trait and the error taxonomy.

pub mod error;
pub mod link;
pub mod registry;
pub mod shortcode;
pub mod store;

pub use error::{RegistryError, StorageError};
pub use link::Link;
pub use registry::{AllocateParams, Registry};
pub use shortcode::ShortCode;
pub use store::{LinkStore, ReadStore};
