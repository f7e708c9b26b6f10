use super::types::{request, response};
use crate::{
    modules::{
        order::repository,
        user::repository::{Role, User},
    },
    types::Context,
};
use std::sync::Arc;

/// Every role sees the orders it is a party to: clients what they ordered,
/// drivers what they deliver, owners what their restaurants received.
pub async fn service(
    ctx: Arc<Context>,
    user: User,
    query: request::Query,
) -> response::Response {
    let orders = match user.role {
        Role::Client => {
            repository::find_many_for_customer(&ctx.db_conn.pool, user.id, query.status).await
        }
        Role::Delivery => {
            repository::find_many_for_driver(&ctx.db_conn.pool, user.id, query.status).await
        }
        Role::Owner => {
            repository::find_many_for_owner(&ctx.db_conn.pool, user.id, query.status).await
        }
    }
    .map_err(|_| response::Error::FailedToFetchOrders)?;

    Ok(response::Success::Orders(orders))
}
