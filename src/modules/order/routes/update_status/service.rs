use super::types::{request, response};
use crate::{
    modules::{
        notification::bus::ORDER_UPDATES,
        order::repository,
        restaurant,
        user::repository::{Role, User},
    },
    types::Context,
};
use serde_json::json;
use std::sync::Arc;

pub async fn service(
    ctx: Arc<Context>,
    user: User,
    id: String,
    payload: request::Payload,
) -> response::Response {
    let order = repository::find_by_id(&ctx.db_conn.pool, id)
        .await
        .map_err(|_| response::Error::FailedToUpdateStatus)?
        .ok_or(response::Error::OrderNotFound)?;

    let owner_id = match &order.restaurant_id {
        Some(restaurant_id) => {
            restaurant::repository::find_by_id(&ctx.db_conn.pool, restaurant_id.clone())
                .await
                .map_err(|_| response::Error::FailedToUpdateStatus)?
                .map(|restaurant| restaurant.owner_id)
        }
        None => None,
    };

    // Owners act on their restaurants' orders, drivers on their assigned
    // deliveries. Being a party to the order is not enough by itself.
    let permitted = match user.role {
        Role::Owner => owner_id.as_deref() == Some(user.id.as_str()),
        Role::Delivery => order.driver_id.as_deref() == Some(user.id.as_str()),
        Role::Client => false,
    };

    if !permitted || !repository::allowed_status_change(user.role, payload.status) {
        return Err(response::Error::NotPermitted);
    }

    let order = repository::update_status(&ctx.db_conn.pool, order.id, payload.status)
        .await
        .map_err(|_| response::Error::FailedToUpdateStatus)?;

    ctx.bus.publish(ORDER_UPDATES, json!({ "order": &order }));

    Ok(response::Success::StatusUpdated(order))
}
