use super::types::response;
use crate::{
    modules::{notification::bus::ORDER_UPDATES, order::repository, user::repository::User},
    types::Context,
};
use serde_json::json;
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, driver: User, id: String) -> response::Response {
    let order = repository::find_by_id(&ctx.db_conn.pool, id)
        .await
        .map_err(|_| response::Error::FailedToTakeOrder)?
        .ok_or(response::Error::OrderNotFound)?;

    // The update is conditional on driver_id still being NULL, so two
    // drivers racing for the same order can't both win.
    let order = repository::set_driver(&ctx.db_conn.pool, order.id, driver.id)
        .await
        .map_err(|_| response::Error::FailedToTakeOrder)?
        .ok_or(response::Error::AlreadyTaken)?;

    ctx.bus.publish(ORDER_UPDATES, json!({ "order": &order }));

    Ok(response::Success::OrderTaken(order))
}
