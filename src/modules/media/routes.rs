use crate::{types::Context, utils::storage};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart};
use serde_json::json;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;

#[derive(TryFromMultipart)]
struct UploadPayload {
    #[form_data(limit = "10MiB")]
    file: FieldData<NamedTempFile>,
}

async fn upload(
    State(ctx): State<Arc<Context>>,
    TypedMultipart(payload): TypedMultipart<UploadPayload>,
) -> impl IntoResponse {
    let mut file = match tokio::fs::File::open(payload.file.contents.path()).await {
        Ok(file) => file,
        Err(err) => {
            tracing::error!("Failed to open uploaded file: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to upload file" })),
            );
        }
    };

    let mut contents = Vec::new();
    if let Err(err) = file.read_to_end(&mut contents).await {
        tracing::error!("Failed to read uploaded file: {}", err);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to upload file" })),
        );
    }

    match storage::upload_file(ctx.storage.clone(), contents).await {
        Ok(url) => (StatusCode::OK, Json(json!({ "url": url }))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to upload file" })),
        ),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new().route("/upload", post(upload))
}
