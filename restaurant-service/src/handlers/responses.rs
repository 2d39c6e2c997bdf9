use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Restaurant;
use crate::validation::FieldError;

pub const RESTAURANT_DELETED: &str = "Restaurant deleted.";

/// Validation failures are reported in the body with status 200.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CreateRestaurantResponse {
    Created(Restaurant),
    Invalid {
        /// One entry per failing field
        error: Vec<FieldError>,
    },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" or "unavailable"
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}
