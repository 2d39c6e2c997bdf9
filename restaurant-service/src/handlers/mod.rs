pub mod responses;
pub mod restaurant;

pub use restaurant::router as restaurant_router;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;

use crate::config::Config;
use crate::db::Database;
use crate::error::StoreError;
use responses::HealthResponse;

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    /// Opens the connection pool and brings the schema up to date.
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let db = Database::connect(config)?;
        db.migrate()?;
        Ok(Self { db })
    }

    pub fn close(self) {
        self.db.close();
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(restaurant_router())
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unavailable", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        ),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                }),
            )
        }
    }
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::create_restaurant,
        restaurant::update_restaurant,
        restaurant::delete_restaurant,
        health,
    ),
    components(
        schemas(
            crate::models::Restaurant,
            crate::models::RestaurantWithMenus,
            crate::models::MenuWithItems,
            crate::models::Menu,
            crate::models::Item,
            crate::validation::RestaurantPayload,
            crate::validation::FieldError,
            responses::CreateRestaurantResponse,
            responses::MessageResponse,
            responses::HealthResponse,
            responses::ApiErrorResponse
        )
    ),
    tags(
        (name = "restaurants", description = "Restaurant management endpoints"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Restaurant Service",
        description = "Restaurants, their menus and menu items",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
