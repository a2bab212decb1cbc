//! HTTP handlers for the Plant Scheduling service

pub mod auth;
pub mod batch;
pub mod catalog;
pub mod health;
pub mod ingredient;
pub mod product;
pub mod weighing;

pub use auth::*;
pub use batch::*;
pub use catalog::*;
pub use health::*;
pub use ingredient::*;
pub use product::*;
pub use weighing::*;
