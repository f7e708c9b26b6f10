use super::repository;
use crate::{
    modules::{auth::guard::Auth, restaurant},
    types::Context,
    utils::validation,
};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{patch, post},
    Router,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// Resolves the restaurant a dish operation targets and rejects callers who
/// don't own it.
async fn owned_restaurant(
    ctx: &Context,
    restaurant_id: String,
    owner_id: &str,
) -> Result<restaurant::repository::Restaurant, Response> {
    let restaurant = restaurant::repository::find_by_id(&ctx.db_conn.pool, restaurant_id)
        .await
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch restaurant" })),
            )
                .into_response()
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Restaurant not found" })),
            )
                .into_response()
        })?;

    if restaurant.owner_id != owner_id {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "You can't manage dishes of a restaurant that you don't own" })),
        )
            .into_response());
    }

    Ok(restaurant)
}

#[derive(Deserialize, Validate)]
struct CreateDishPayload {
    #[validate(length(min = 1))]
    name: String,
    price: BigDecimal,
    #[validate(length(min = 1))]
    description: String,
    photo: Option<String>,
    restaurant_id: String,
    #[serde(default)]
    options: Vec<repository::DishOption>,
}

async fn create_dish(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Json(payload): Json<CreateDishPayload>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return validation::into_response(errors).into_response();
    }

    let restaurant = match owned_restaurant(&ctx, payload.restaurant_id, &auth.user.id).await {
        Ok(restaurant) => restaurant,
        Err(response) => return response,
    };

    match repository::create(
        &ctx.db_conn.pool,
        repository::CreateDishPayload {
            name: payload.name,
            price: payload.price,
            description: payload.description,
            photo: payload.photo,
            restaurant_id: restaurant.id,
            options: payload.options,
        },
    )
    .await
    {
        Ok(dish) => (StatusCode::CREATED, Json(json!(dish))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to create dish" })),
        )
            .into_response(),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateDishPayload {
    #[validate(length(min = 1))]
    name: Option<String>,
    price: Option<BigDecimal>,
    #[validate(length(min = 1))]
    description: Option<String>,
    photo: Option<String>,
    options: Option<Vec<repository::DishOption>>,
}

async fn update_dish(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDishPayload>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return validation::into_response(errors).into_response();
    }

    let dish = match repository::find_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(dish)) => dish,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Dish not found" })),
            )
                .into_response()
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update dish" })),
            )
                .into_response()
        }
    };

    if let Err(response) = owned_restaurant(&ctx, dish.restaurant_id.clone(), &auth.user.id).await {
        return response;
    }

    match repository::update_by_id(
        &ctx.db_conn.pool,
        dish.id,
        repository::UpdateDishPayload {
            name: payload.name,
            price: payload.price,
            description: payload.description,
            photo: payload.photo,
            options: payload.options,
        },
    )
    .await
    {
        Ok(dish) => (StatusCode::OK, Json(json!(dish))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to update dish" })),
        )
            .into_response(),
    }
}

async fn delete_dish(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
) -> Response {
    let dish = match repository::find_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(dish)) => dish,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Dish not found" })),
            )
                .into_response()
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to delete dish" })),
            )
                .into_response()
        }
    };

    if let Err(response) = owned_restaurant(&ctx, dish.restaurant_id.clone(), &auth.user.id).await {
        return response;
    }

    match repository::delete_by_id(&ctx.db_conn.pool, dish.id).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "message": "Dish deleted" }))).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to delete dish" })),
        )
            .into_response(),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", post(create_dish))
        .route("/:id", patch(update_dish).delete(delete_dish))
}
