use super::{service::service, types::request};
use crate::{modules::auth::guard::Auth, types::Context};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Query(query): Query<request::Query>,
) -> impl IntoResponse {
    service(ctx, auth.user, query).await
}
