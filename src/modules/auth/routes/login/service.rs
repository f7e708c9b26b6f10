use super::types::{request, response};
use crate::{
    modules::{auth::service, user},
    types::Context,
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user = user::repository::find_by_email(&ctx.db_conn.pool, payload.email.to_lowercase())
        .await
        .map_err(|_| response::Error::FailedToLogin)?
        .ok_or(response::Error::UserNotFound)?;

    if !service::password::verify(payload.password.as_str(), user.password_hash.as_str()) {
        return Err(response::Error::WrongPassword);
    }

    let token = service::token::sign(
        ctx.auth.token_secret.as_str(),
        &service::token::Claims { id: user.id },
    );

    Ok(response::Success::Token(token))
}
