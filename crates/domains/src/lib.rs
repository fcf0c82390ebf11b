//! domains/src/lib.rs
//!
//! Entities, error taxonomy and port definitions for the forum.

pub mod error;
pub mod models;
pub mod params;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use params::*;
pub use traits::*;
