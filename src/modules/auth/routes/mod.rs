mod create_account;
mod login;
mod verify_email;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .nest("/sign-up", create_account::get_router())
        .nest("/sign-in", login::get_router())
        .nest("/verification", verify_email::get_router())
}
