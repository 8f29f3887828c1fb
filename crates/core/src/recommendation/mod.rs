//! AI portfolio recommendation module.

mod recommendation_model;
mod recommendation_requester;
mod recommendation_traits;

pub use recommendation_model::{RecommendationSnapshot, RecommendedProduct};
pub use recommendation_requester::RecommendationRequester;
pub use recommendation_traits::RecommendationApiClient;
