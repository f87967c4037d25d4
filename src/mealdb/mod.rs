pub mod connection;
pub mod endpoints;
pub mod normalize;

pub use connection::{MealDbClient, MealDbError};
pub use endpoints::{Meal, MealSearchResponse};
pub use normalize::{normalize_meal, normalize_response, number_instructions};
