use crate::{
    modules::{
        auth::guard::Auth,
        notification::bus::{ORDER_PENDING, ORDER_UPDATES},
        order::repository,
        restaurant,
    },
    types::Context,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use std::{convert::Infallible, sync::Arc};

fn into_sse(
    stream: impl Stream<Item = Value> + Send + 'static,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(stream.map(|payload| Ok(Event::default().json_data(&payload).unwrap_or_default())))
        .keep_alive(KeepAlive::default())
}

/// Streams every new order placed against one of the caller's restaurants.
async fn pending_orders(State(ctx): State<Arc<Context>>, auth: Auth) -> impl IntoResponse {
    let owner_id = json!(auth.user.id);

    into_sse(
        ctx.bus
            .subscribe(ORDER_PENDING, move |payload| payload["owner_id"] == owner_id)
            .map(|payload| payload["order"].clone()),
    )
}

/// Streams status changes of a single order the caller is a party to.
async fn order_updates(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Path(id): Path<String>,
) -> Response {
    let order = match repository::find_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Order not found" })),
            )
                .into_response()
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Could not subscribe to order" })),
            )
                .into_response()
        }
    };

    let owner_id = match &order.restaurant_id {
        Some(restaurant_id) => {
            match restaurant::repository::find_by_id(&ctx.db_conn.pool, restaurant_id.clone())
                .await
            {
                Ok(restaurant) => restaurant.map(|restaurant| restaurant.owner_id),
                Err(_) => {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": "Could not subscribe to order" })),
                    )
                        .into_response()
                }
            }
        }
        None => None,
    };

    // Same uniform answer as fetching the order: strangers learn nothing.
    if !repository::can_access(auth.user.id.as_str(), &order, owner_id.as_deref()) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Order not found" })),
        )
            .into_response();
    }

    let order_id = json!(order.id);

    into_sse(
        ctx.bus
            .subscribe(ORDER_UPDATES, move |payload| {
                payload["order"]["id"] == order_id
            })
            .map(|payload| payload["order"].clone()),
    )
    .into_response()
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/subscriptions/pending", get(pending_orders))
        .route("/:id/subscription", get(order_updates))
}
