use super::repository;
use crate::{
    modules::{auth::guard::Auth, category, dish},
    types::Context,
    utils::{pagination::Pagination, validation},
};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Deserialize, Validate)]
struct CreateRestaurantPayload {
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 1))]
    address: String,
    cover_image: Option<String>,
    #[validate(length(min = 1))]
    category_name: String,
}

async fn create_restaurant(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Json(payload): Json<CreateRestaurantPayload>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return validation::into_response(errors).into_response();
    }

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start database transaction: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to create restaurant" })),
            )
                .into_response();
        }
    };

    let category = match category::repository::get_or_create(&mut *tx, payload.category_name).await
    {
        Ok(category) => category,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to create restaurant" })),
            )
                .into_response()
        }
    };

    let restaurant = match repository::create(
        &mut *tx,
        repository::CreateRestaurantPayload {
            name: payload.name,
            address: payload.address,
            cover_image: payload.cover_image,
            owner_id: auth.user.id,
            category_id: category.id,
        },
    )
    .await
    {
        Ok(restaurant) => restaurant,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to create restaurant" })),
            )
                .into_response()
        }
    };

    match tx.commit().await {
        Ok(_) => (StatusCode::CREATED, Json(json!(restaurant))).into_response(),
        Err(err) => {
            tracing::error!("Failed to commit database transaction: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to create restaurant" })),
            )
                .into_response()
        }
    }
}

async fn get_restaurants(
    State(ctx): State<Arc<Context>>,
    pagination: Pagination,
) -> impl IntoResponse {
    match repository::find_many(&ctx.db_conn.pool, pagination).await {
        Ok(restaurants) => (StatusCode::OK, Json(json!(restaurants))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch restaurants" })),
        ),
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    query: String,
}

async fn search_restaurants(
    State(ctx): State<Arc<Context>>,
    Query(search): Query<SearchQuery>,
    pagination: Pagination,
) -> impl IntoResponse {
    match repository::search_by_name(&ctx.db_conn.pool, search.query, pagination).await {
        Ok(restaurants) => (StatusCode::OK, Json(json!(restaurants))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to search restaurants" })),
        ),
    }
}

async fn get_my_restaurants(State(ctx): State<Arc<Context>>, auth: Auth) -> impl IntoResponse {
    match repository::find_many_by_owner_id(&ctx.db_conn.pool, auth.user.id).await {
        Ok(restaurants) => (StatusCode::OK, Json(json!({ "restaurants": restaurants }))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch restaurants" })),
        ),
    }
}

async fn get_restaurant_by_id(
    State(ctx): State<Arc<Context>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let restaurant = match repository::find_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(restaurant)) => restaurant,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Restaurant not found" })),
            )
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch restaurant" })),
            )
        }
    };

    match dish::repository::find_many_by_restaurant_id(&ctx.db_conn.pool, restaurant.id.clone())
        .await
    {
        Ok(menu) => (
            StatusCode::OK,
            Json(json!({ "restaurant": restaurant, "menu": menu })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch restaurant" })),
        ),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateRestaurantPayload {
    #[validate(length(min = 1))]
    name: Option<String>,
    #[validate(length(min = 1))]
    address: Option<String>,
    cover_image: Option<String>,
    #[validate(length(min = 1))]
    category_name: Option<String>,
}

async fn update_restaurant(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRestaurantPayload>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return validation::into_response(errors).into_response();
    }

    let restaurant = match repository::find_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(restaurant)) => restaurant,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Restaurant not found" })),
            )
                .into_response()
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update restaurant" })),
            )
                .into_response()
        }
    };

    if restaurant.owner_id != auth.user.id {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "You can't edit a restaurant that you don't own" })),
        )
            .into_response();
    }

    let category_id = match payload.category_name {
        Some(name) => match category::repository::get_or_create(&ctx.db_conn.pool, name).await {
            Ok(category) => Some(category.id),
            Err(_) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update restaurant" })),
                )
                    .into_response()
            }
        },
        None => None,
    };

    match repository::update_by_id(
        &ctx.db_conn.pool,
        restaurant.id,
        repository::UpdateRestaurantPayload {
            name: payload.name,
            address: payload.address,
            cover_image: payload.cover_image,
            category_id,
        },
    )
    .await
    {
        Ok(restaurant) => (StatusCode::OK, Json(json!(restaurant))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to update restaurant" })),
        )
            .into_response(),
    }
}

async fn delete_restaurant(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let restaurant = match repository::find_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(restaurant)) => restaurant,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Restaurant not found" })),
            )
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to delete restaurant" })),
            )
        }
    };

    if restaurant.owner_id != auth.user.id {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "You can't delete a restaurant that you don't own" })),
        );
    }

    match repository::delete_by_id(&ctx.db_conn.pool, restaurant.id).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Restaurant deleted" })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to delete restaurant" })),
        ),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", post(create_restaurant).get(get_restaurants))
        .route("/search", get(search_restaurants))
        .route("/mine", get(get_my_restaurants))
        .route(
            "/:id",
            get(get_restaurant_by_id)
                .patch(update_restaurant)
                .delete(delete_restaurant),
        )
}
