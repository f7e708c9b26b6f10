use super::repository;
use crate::{modules::restaurant, types::Context, utils::pagination::Pagination};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

async fn get_categories(State(ctx): State<Arc<Context>>) -> impl IntoResponse {
    match repository::find_all(&ctx.db_conn.pool).await {
        Ok(categories) => (StatusCode::OK, Json(json!({ "categories": categories }))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch categories" })),
        ),
    }
}

async fn get_category_by_slug(
    State(ctx): State<Arc<Context>>,
    Path(slug): Path<String>,
    pagination: Pagination,
) -> impl IntoResponse {
    let category = match repository::find_by_slug(&ctx.db_conn.pool, slug).await {
        Ok(Some(category)) => category,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Category not found" })),
            )
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch category" })),
            )
        }
    };

    let restaurants = match restaurant::repository::find_many_by_category_id(
        &ctx.db_conn.pool,
        category.id.clone(),
        pagination.clone(),
    )
    .await
    {
        Ok(restaurants) => restaurants,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch category" })),
            )
        }
    };

    (
        StatusCode::OK,
        Json(json!({ "category": category, "restaurants": restaurants })),
    )
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_categories))
        .route("/:slug", get(get_category_by_slug))
}
