use super::repository;
use crate::{
    modules::auth::{self, guard::Auth},
    types::Context,
    utils::{mail, validation},
};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

async fn get_profile(auth: Auth) -> impl IntoResponse {
    (StatusCode::OK, Json(auth.user))
}

async fn get_user_by_id(
    State(ctx): State<Arc<Context>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match repository::find_by_id(&ctx.db_conn.pool, id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(json!(user))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch user" })),
        ),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateProfilePayload {
    #[validate(email)]
    email: Option<String>,
    #[validate(length(min = 8))]
    password: Option<String>,
}

async fn update_profile(
    State(ctx): State<Arc<Context>>,
    auth: Auth,
    Json(payload): Json<UpdateProfilePayload>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return validation::into_response(errors).into_response();
    }

    let password_hash = match payload.password {
        Some(password) => match auth::service::password::hash(password.as_str()) {
            Ok(hash) => Some(hash),
            Err(_) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to update profile" })),
                )
                    .into_response()
            }
        },
        None => None,
    };

    // An email change invalidates the previous address until re-verified.
    let email_changed = payload
        .email
        .as_ref()
        .is_some_and(|email| email != &auth.user.email);

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start database transaction: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update profile" })),
            )
                .into_response();
        }
    };

    let user = match repository::update_by_id(
        &mut *tx,
        auth.user.id.clone(),
        repository::UpdateUserPayload {
            email: payload.email,
            password_hash,
            is_verified: email_changed.then_some(false),
        },
    )
    .await
    {
        Ok(user) => user,
        Err(repository::Error::DuplicateEmail) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "There is a user with that email already" })),
            )
                .into_response()
        }
        Err(repository::Error::UnexpectedError) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update profile" })),
            )
                .into_response()
        }
    };

    if email_changed {
        let verification =
            match auth::repository::create_for_user(&mut *tx, user.id.clone()).await {
                Ok(verification) => verification,
                Err(_) => {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": "Failed to update profile" })),
                    )
                        .into_response()
                }
            };

        if let Err(err) = tx.commit().await {
            tracing::error!("Failed to commit database transaction: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update profile" })),
            )
                .into_response();
        }

        tokio::spawn(mail::send_verification_email(
            ctx.mail.clone(),
            user.email.clone(),
            verification.code,
        ));

        return (StatusCode::OK, Json(json!(user))).into_response();
    }

    match tx.commit().await {
        Ok(_) => (StatusCode::OK, Json(json!(user))).into_response(),
        Err(err) => {
            tracing::error!("Failed to commit database transaction: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update profile" })),
            )
                .into_response()
        }
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/profile", get(get_profile).patch(update_profile))
        .route("/:id", get(get_user_by_id))
}
