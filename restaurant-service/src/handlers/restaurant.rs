use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::error::ApiError;
use crate::models::{Restaurant, RestaurantChangeset, RestaurantWithMenus};
use crate::store::restaurant as store;
use crate::validation::{coerce_text, validate_restaurant, RestaurantPayload};

use super::responses::*;
use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/restaurants",
            get(list_restaurants).post(create_restaurant),
        )
        .route(
            "/restaurants/{id}",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "All restaurants with their menus and items", body = [RestaurantWithMenus]),
        (status = 500, description = "Database error", body = ApiErrorResponse),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantWithMenus>>, ApiError> {
    let restaurants = state.db.run(store::find_all_with_menus).await?;
    debug!(count = restaurants.len(), "listed restaurants");

    Ok(Json(restaurants))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant details, or null if there is no such restaurant", body = Restaurant),
        (status = 500, description = "Database error", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Option<Restaurant>>, ApiError> {
    let restaurant = state
        .db
        .run(move |conn| store::find_by_pk(conn, id))
        .await?;

    Ok(Json(restaurant))
}

#[utoipa::path(
    post,
    path = "/restaurants",
    request_body = RestaurantPayload,
    responses(
        (status = 200, description = "Created restaurant, or the list of invalid fields", body = CreateRestaurantResponse),
        (status = 500, description = "Database error", body = ApiErrorResponse),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn create_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<RestaurantPayload>,
) -> Result<Json<CreateRestaurantResponse>, ApiError> {
    let restaurant = match validate_restaurant(&payload) {
        Ok(restaurant) => restaurant,
        Err(error) => {
            info!(invalid = error.len(), "rejected restaurant payload");
            return Ok(Json(CreateRestaurantResponse::Invalid { error }));
        }
    };

    let created = state
        .db
        .run(move |conn| store::create(conn, &restaurant.as_new()))
        .await?;
    info!(id = created.id, "created restaurant");

    Ok(Json(CreateRestaurantResponse::Created(created)))
}

#[utoipa::path(
    put,
    path = "/restaurants/{id}",
    request_body = RestaurantPayload,
    responses(
        (status = 200, description = "Updated restaurant, or null if there is no such restaurant", body = Restaurant),
        (status = 500, description = "Database error", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RestaurantPayload>,
) -> Result<Json<Option<Restaurant>>, ApiError> {
    // Update skips validation; only scalar fields are written.
    let changeset = RestaurantChangeset {
        name: payload.name.as_ref().and_then(coerce_text),
        location: payload.location.as_ref().and_then(coerce_text),
        cuisine: payload.cuisine.as_ref().and_then(coerce_text),
        updated_at: Utc::now().naive_utc(),
    };

    let updated = state
        .db
        .run(move |conn| store::update(conn, id, &changeset))
        .await?;
    info!(found = updated.is_some(), "updated restaurant");

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Always returned, whether or not the restaurant existed", body = MessageResponse),
        (status = 500, description = "Database error", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state
        .db
        .run(move |conn| store::destroy(conn, id))
        .await?;
    info!(deleted, "deleted restaurant");

    Ok(Json(MessageResponse {
        message: RESTAURANT_DELETED.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use bigdecimal::BigDecimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::super::app;
    use super::*;
    use crate::config::Config;
    use crate::fixtures;
    use crate::models::{NewItem, NewMenu, NewRestaurant};
    use crate::store::menu;

    fn setup_app() -> (AppState, Router) {
        let state = AppState::open(&Config::in_memory()).unwrap();
        (state.clone(), app(state))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn create(app: &Router, name: &str, location: &str, cuisine: &str) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/restaurants",
            Some(json!({ "name": name, "location": location, "cuisine": cuisine })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn test_list_restaurants_empty() {
        let (_, app) = setup_app();

        let (status, body) = send(&app, "GET", "/restaurants", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_seeded_restaurants() {
        let (state, app) = setup_app();
        state.db.run(fixtures::seed).await.unwrap();

        let (status, body) = send(&app, "GET", "/restaurants", None).await;
        let amount = state.db.run(store::count).await.unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "AppleBees");
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["menus"], json!([]));
        assert_eq!(amount, 3);
    }

    #[tokio::test]
    async fn test_list_restaurants_nests_menus_and_items() {
        let (state, app) = setup_app();
        state
            .db
            .run(|conn| -> diesel::QueryResult<()> {
                let restaurant = store::create(
                    conn,
                    &NewRestaurant {
                        name: "Spice Grill House",
                        location: "Houston",
                        cuisine: "Indian",
                    },
                )?;
                let dinner = menu::create_menu(
                    conn,
                    &NewMenu {
                        title: "Dinner",
                        restaurant_id: Some(restaurant.id),
                    },
                )?;
                let items = menu::create_items(
                    conn,
                    &[
                        NewItem {
                            name: "bhindi masala",
                            image: "someimage.jpg",
                            price: BigDecimal::parse_bytes(b"9.50", 10).unwrap(),
                            vegetarian: true,
                        },
                        NewItem {
                            name: "egusi soup",
                            image: "someimage.jpg",
                            price: BigDecimal::parse_bytes(b"10.95", 10).unwrap(),
                            vegetarian: false,
                        },
                    ],
                )?;
                menu::add_items(conn, dinner.id, &[items[0].id, items[1].id])?;
                Ok(())
            })
            .await
            .unwrap();

        let (_, body) = send(&app, "GET", "/restaurants", None).await;
        let menus = &body[0]["menus"];
        assert_eq!(menus.as_array().unwrap().len(), 1);
        assert_eq!(menus[0]["title"], "Dinner");
        assert_eq!(menus[0]["restaurant_id"], body[0]["id"]);
        assert_eq!(menus[0]["items"].as_array().unwrap().len(), 2);
        assert_eq!(menus[0]["items"][0]["name"], "bhindi masala");
        assert_eq!(menus[0]["items"][0]["vegetarian"], true);
        assert_eq!(menus[0]["items"][0]["price"], "9.50");
        assert_eq!(menus[0]["items"][1]["price"], "10.95");
    }

    #[tokio::test]
    async fn test_create_restaurant() {
        let (_, app) = setup_app();

        let body = create(&app, "Kentucky Fried", "Kentucky", "Fried").await;
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["name"], "Kentucky Fried");
        assert_eq!(body["location"], "Kentucky");
        assert_eq!(body["cuisine"], "Fried");
        assert!(body["created_at"].is_string());
        assert!(body.get("error").is_none());

        let (_, fetched) = send(&app, "GET", &format!("/restaurants/{}", body["id"]), None).await;
        assert_eq!(fetched, body);
    }

    #[tokio::test]
    async fn test_create_restaurant_trims_fields() {
        let (_, app) = setup_app();

        let body = create(&app, "  Jojo's Candy  ", " Miami ", "Candy").await;
        assert_eq!(body["name"], "Jojo's Candy");
        assert_eq!(body["location"], "Miami");
    }

    #[tokio::test]
    async fn test_create_restaurant_name_too_short() {
        let (state, app) = setup_app();

        let body = create(&app, "KFC", "Kentucky", "Fried").await;
        assert_eq!(body["error"][0]["msg"], "Invalid value");
        assert_eq!(body["error"][0]["path"], "name");
        assert_eq!(body["error"][0]["value"], "KFC");
        assert_eq!(body["error"].as_array().unwrap().len(), 1);

        assert_eq!(state.db.run(store::count).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_restaurant_name_too_long() {
        let (_, app) = setup_app();

        let body = create(&app, &"x".repeat(31), "Kentucky", "Fried").await;
        assert_eq!(body["error"][0]["msg"], "Invalid value");
    }

    #[tokio::test]
    async fn test_create_restaurant_missing_fields() {
        let (_, app) = setup_app();

        let (status, body) = send(
            &app,
            "POST",
            "/restaurants",
            Some(json!({ "name": "Missing Fields Diner", "cuisine": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "error": [
                    { "type": "field", "msg": "Invalid value", "path": "location", "location": "body" },
                    { "type": "field", "value": "", "msg": "Invalid value", "path": "cuisine", "location": "body" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_create_restaurant_wrong_types_are_invalid_fields() {
        let (state, app) = setup_app();

        let (status, body) = send(
            &app,
            "POST",
            "/restaurants",
            Some(json!({ "name": 5, "location": ["x"], "cuisine": "Candy" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "error": [
                    { "type": "field", "value": "5", "msg": "Invalid value", "path": "name", "location": "body" },
                    { "type": "field", "value": ["x"], "msg": "Invalid value", "path": "location", "location": "body" }
                ]
            })
        );
        assert_eq!(state.db.run(store::count).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_restaurant_coerces_scalars() {
        let (_, app) = setup_app();

        let (_, body) = send(
            &app,
            "POST",
            "/restaurants",
            Some(json!({ "name": 1234567890, "location": "NYC", "cuisine": true })),
        )
        .await;
        assert_eq!(body["name"], "1234567890");
        assert_eq!(body["cuisine"], "true");
    }

    #[tokio::test]
    async fn test_get_missing_restaurant_returns_null() {
        let (_, app) = setup_app();

        let (status, body) = send(&app, "GET", "/restaurants/42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_update_restaurant() {
        let (_, app) = setup_app();
        let created = create(&app, "Jojo's Candy", "Miami", "Candy").await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/restaurants/{}", created["id"]),
            Some(json!({ "name": "Jojo's Candy", "location": "El Paso", "cuisine": "Candy" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
        assert_eq!(body["location"], "El Paso");
        assert_eq!(body["created_at"], created["created_at"]);
    }

    #[tokio::test]
    async fn test_update_restaurant_skips_validation_and_missing_fields() {
        let (_, app) = setup_app();
        let created = create(&app, "Jojo's Candy", "Miami", "Candy").await;

        let (_, body) = send(
            &app,
            "PUT",
            &format!("/restaurants/{}", created["id"]),
            Some(json!({ "name": "JC" })),
        )
        .await;
        assert_eq!(body["name"], "JC");
        assert_eq!(body["location"], "Miami");
        assert_eq!(body["cuisine"], "Candy");
    }

    #[tokio::test]
    async fn test_update_missing_restaurant_returns_null() {
        let (_, app) = setup_app();

        let (status, body) = send(
            &app,
            "PUT",
            "/restaurants/42",
            Some(json!({ "name": "Nobody Home Cafe", "location": "Nowhere", "cuisine": "None" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_delete_restaurant() {
        let (_, app) = setup_app();
        let created = create(&app, "See's Candy Store", "NYC", "Candy").await;
        let uri = format!("/restaurants/{}", created["id"]);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Restaurant deleted." }));

        let (_, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(fetched, Value::Null);
    }

    #[tokio::test]
    async fn test_delete_missing_restaurant() {
        let (_, app) = setup_app();

        let (status, body) = send(&app, "DELETE", "/restaurants/42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Restaurant deleted." }));
    }
}
