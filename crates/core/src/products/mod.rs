//! Financial products attached to a goal.

mod products_model;

pub use products_model::{Product, ProductType, RateBasis};
