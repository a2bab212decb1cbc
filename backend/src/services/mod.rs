//! Business logic services for the Plant Scheduling service

pub mod auth;
pub mod catalog;
pub mod ingredient;
pub mod product;
pub mod scheduling;
pub mod weighing;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use ingredient::IngredientService;
pub use product::ProductService;
pub use scheduling::SchedulingService;
pub use weighing::WeighingService;
