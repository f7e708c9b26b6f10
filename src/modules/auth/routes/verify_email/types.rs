pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Payload {
        pub code: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        EmailVerified,
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::EmailVerified => (
                    StatusCode::OK,
                    Json(json!({ "message": "Email verified successfully" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        VerificationNotFound,
        FailedToVerifyEmail,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::VerificationNotFound => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Verification not found" })),
                )
                    .into_response(),
                Self::FailedToVerifyEmail => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Could not verify email" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
