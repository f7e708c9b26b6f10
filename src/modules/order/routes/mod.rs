mod create;
mod get;
mod list;
mod subscriptions;
mod take;
mod update_status;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(create::get_router())
        .merge(list::get_router())
        .merge(subscriptions::get_router())
        .merge(get::get_router())
        .merge(take::get_router())
        .merge(update_status::get_router())
}
