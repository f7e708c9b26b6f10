pub mod request {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub struct Payload {
        pub email: String,
        pub password: String,
    }
}

pub mod response {
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Token(String),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Token(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
            }
        }
    }

    pub enum Error {
        UserNotFound,
        WrongPassword,
        FailedToLogin,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "User not found" })),
                )
                    .into_response(),
                Self::WrongPassword => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Wrong password" })),
                )
                    .into_response(),
                Self::FailedToLogin => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Could not login" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
