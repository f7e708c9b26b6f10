use super::types::response;
use crate::{
    modules::{order::repository, restaurant, user::repository::User},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, user: User, id: String) -> response::Response {
    let order = repository::find_by_id(&ctx.db_conn.pool, id)
        .await
        .map_err(|_| response::Error::FailedToFetchOrder)?
        .ok_or(response::Error::OrderNotFound)?;

    let owner_id = match &order.restaurant_id {
        Some(restaurant_id) => {
            restaurant::repository::find_by_id(&ctx.db_conn.pool, restaurant_id.clone())
                .await
                .map_err(|_| response::Error::FailedToFetchOrder)?
                .map(|restaurant| restaurant.owner_id)
        }
        None => None,
    };

    if !repository::can_access(user.id.as_str(), &order, owner_id.as_deref()) {
        return Err(response::Error::OrderNotFound);
    }

    let items = repository::find_items_by_order_id(&ctx.db_conn.pool, order.id.clone())
        .await
        .map_err(|_| response::Error::FailedToFetchOrder)?;

    Ok(response::Success::Order(order, items))
}
