use crate::types::StorageContext;
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use ulid::Ulid;

#[derive(Debug)]
pub enum Error {
    UploadFailed,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

fn sign_upload(cfg: &StorageContext, timestamp: i64) -> String {
    let data_to_sign = format!(
        "timestamp={}&upload_preset={}{}",
        timestamp, cfg.upload_preset, cfg.api_secret
    );

    let mut hasher = Sha256::new();
    hasher.update(data_to_sign);
    base16ct::lower::encode_string(&hasher.finalize())
}

/// Forwards raw bytes to the object storage collaborator and returns the
/// public url of the uploaded file.
pub async fn upload_file(cfg: StorageContext, contents: Vec<u8>) -> Result<String, Error> {
    let timestamp = chrono::Utc::now().timestamp();
    let signature = sign_upload(&cfg, timestamp);

    let form = Form::new()
        .text("upload_preset", cfg.upload_preset.clone())
        .text("api_key", cfg.api_key.clone())
        .text("timestamp", timestamp.to_string())
        .text("signature", signature)
        .text("signature_algorithm", "sha256")
        .part(
            "file",
            Part::bytes(contents).file_name(Ulid::new().to_string()),
        );

    let res = Client::new()
        .post(cfg.upload_endpoint)
        .multipart(form)
        .send()
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to upload a file: {:?}", err);
            Error::UploadFailed
        })?;

    if res.status() != StatusCode::OK {
        let data = res.text().await.unwrap_or_default();
        tracing::error!("Failed to upload file: {}", data);
        return Err(Error::UploadFailed);
    }

    res.json::<UploadResponse>()
        .await
        .map(|data| data.secure_url)
        .map_err(|err| {
            tracing::error!("Failed to deserialize storage response: {:?}", err);
            Error::UploadFailed
        })
}
