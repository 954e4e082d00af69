//! Shared primitives for the Aequorea cheminformatics workspace.
//!
//! `aequorea-core` provides the foundation the domain crates build on:
//!
//! - **Error types** — [`AequoreaError`] and [`Result`] for structured error handling
//! - **Traits** — [`ContentAddressable`], [`Summarizable`], [`Annotated`]
//! - **Hashing** — SHA-256 content addressing for reproducibility checks

pub mod error;
pub mod hash;
pub mod traits;

pub use error::{AequoreaError, Result};
pub use traits::*;
