//! Shared types and models for the Plant Scheduling service
//!
//! Wire models keep the field names of the plant's existing HTTP API
//! (Spanish, mostly PascalCase) so current clients and scales keep working.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
