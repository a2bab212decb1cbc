//! Domain models for the Plant Scheduling service

mod batch;
mod catalog;
mod ingredient;
mod product;
mod user;
mod weighing;

pub use batch::*;
pub use catalog::*;
pub use ingredient::*;
pub use product::*;
pub use user::*;
pub use weighing::*;
