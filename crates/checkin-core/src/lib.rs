//! # checkin-core
//!
//! Core types, traits, and abstractions for the checkinlog service.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the database layer and the CSV import pipeline depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
