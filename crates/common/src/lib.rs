//! Shared types for the Adobe Sign workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
