//! Short code generators.
//!
//! A generator only proposes candidates. Uniqueness is checked by the
//! store when the registry tries to insert the candidate.

pub mod error;
pub mod random;

pub use error::GeneratorError;
pub use random::RandomGenerator;

use tinylink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// They may repeat earlier output; callers must handle collisions.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates a candidate short code.
    fn generate(&self) -> Self::Output;
}
