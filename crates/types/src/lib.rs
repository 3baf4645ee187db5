//! Shared types for layered configuration loading
//!
//! This crate contains the error type and the environment binding model used
//! by the `layerconf` loader.

pub mod binding;
pub mod error;

// Re-export commonly used types
pub use binding::{EnvBinding, EnvBindings, EnvKind};
pub use error::{LoadError, LoadPhase, Result};
