use super::types::{request, response};
use crate::{
    modules::{auth, user},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToVerifyEmail
    })?;

    let verification = auth::repository::find_by_code(&mut *tx, payload.code)
        .await
        .map_err(|_| response::Error::FailedToVerifyEmail)?
        .ok_or(response::Error::VerificationNotFound)?;

    user::repository::update_by_id(
        &mut *tx,
        verification.user_id.clone(),
        user::repository::UpdateUserPayload {
            is_verified: Some(true),
            ..Default::default()
        },
    )
    .await
    .map_err(|_| response::Error::FailedToVerifyEmail)?;

    // A code only works once.
    auth::repository::delete_by_id(&mut *tx, verification.id)
        .await
        .map_err(|_| response::Error::FailedToVerifyEmail)?;

    tx.commit()
        .await
        .map(|_| response::Success::EmailVerified)
        .map_err(|err| {
            tracing::error!("Failed to commit database transaction: {}", err);
            response::Error::FailedToVerifyEmail
        })
}
