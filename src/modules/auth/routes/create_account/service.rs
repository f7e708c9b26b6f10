use super::types::{request, response};
use crate::{
    modules::{auth, user},
    types::Context,
    utils::mail,
};
use std::sync::Arc;
use validator::Validate;

/// A duplicate landing on the unique email index is still a conflict, even
/// when it slipped past the pre-flight check.
fn map_create_error(err: user::repository::Error) -> response::Error {
    match err {
        user::repository::Error::DuplicateEmail => response::Error::EmailAlreadyInUse,
        user::repository::Error::UnexpectedError => response::Error::FailedToCreateAccount,
    }
}

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let email = payload.email.to_lowercase();

    let mut tx = ctx.db_conn.pool.begin().await.map_err(|err| {
        tracing::error!("Failed to start database transaction: {}", err);
        response::Error::FailedToCreateAccount
    })?;

    if user::repository::find_by_email(&mut *tx, email.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateAccount)?
        .is_some()
    {
        return Err(response::Error::EmailAlreadyInUse);
    }

    let password_hash = auth::service::password::hash(payload.password.as_str())
        .map_err(|_| response::Error::FailedToCreateAccount)?;

    let user = user::repository::create(
        &mut *tx,
        user::repository::CreateUserPayload {
            email,
            password_hash,
            role: payload.role,
        },
    )
    .await
    .map_err(map_create_error)?;

    let verification = auth::repository::create_for_user(&mut *tx, user.id.clone())
        .await
        .map_err(|_| response::Error::FailedToCreateAccount)?;

    tx.commit().await.map_err(|err| {
        tracing::error!("Failed to commit database transaction: {}", err);
        response::Error::FailedToCreateAccount
    })?;

    // A failed email is not fatal, the user can re-request a code.
    tokio::spawn(mail::send_verification_email(
        ctx.mail.clone(),
        user.email,
        verification.code,
    ));

    Ok(response::Success::AccountCreated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn racing_duplicate_email_surfaces_as_conflict() {
        assert!(matches!(
            map_create_error(user::repository::Error::DuplicateEmail),
            response::Error::EmailAlreadyInUse
        ));
        assert!(matches!(
            map_create_error(user::repository::Error::UnexpectedError),
            response::Error::FailedToCreateAccount
        ));
    }
}
