use super::types::{request, response};
use crate::{
    modules::{
        dish,
        notification::bus::ORDER_PENDING,
        order::{pricing, repository},
        restaurant,
        user::repository::User,
    },
    types::Context,
};
use bigdecimal::BigDecimal;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

pub async fn service(
    ctx: Arc<Context>,
    customer: User,
    payload: request::Payload,
) -> response::Response {
    payload
        .validate()
        .map_err(response::Error::FailedToValidate)?;

    // Everything below happens in one transaction so a missing dish leaves
    // nothing behind.
    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToCreateOrder
    })?;

    let restaurant = restaurant::repository::find_by_id(&mut *tx, payload.restaurant_id)
        .await
        .map_err(|_| response::Error::FailedToCreateOrder)?
        .ok_or(response::Error::RestaurantNotFound)?;

    let mut total = BigDecimal::from(0);
    let mut priced_items = Vec::with_capacity(payload.items.len());

    for item in payload.items {
        let dish = dish::repository::find_by_id(&mut *tx, item.dish_id.clone())
            .await
            .map_err(|_| response::Error::FailedToCreateOrder)?
            .filter(|dish| dish.restaurant_id == restaurant.id)
            .ok_or_else(|| response::Error::DishNotFound(item.dish_id.clone()))?;

        let unit_price = pricing::unit_price(&dish.price, &dish.options.0, &item.options);
        total += unit_price.clone();
        priced_items.push((dish, unit_price, item.options));
    }

    let order = repository::create(
        &mut *tx,
        repository::CreateOrderPayload {
            customer_id: customer.id,
            restaurant_id: restaurant.id,
            total,
        },
    )
    .await
    .map_err(|_| response::Error::FailedToCreateOrder)?;

    let mut items = Vec::with_capacity(priced_items.len());

    for (dish, unit_price, options) in priced_items {
        let item = repository::create_item(
            &mut *tx,
            repository::CreateOrderItemPayload {
                order_id: order.id.clone(),
                dish_id: dish.id,
                dish_name: dish.name,
                unit_price,
                options,
            },
        )
        .await
        .map_err(|_| response::Error::FailedToCreateOrder)?;

        items.push(item);
    }

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToCreateOrder
    })?;

    ctx.bus.publish(
        ORDER_PENDING,
        json!({ "owner_id": restaurant.owner_id, "order": &order }),
    );

    Ok(response::Success::OrderCreated(order, items))
}
