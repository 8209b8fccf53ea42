use std::collections::BTreeMap;

use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{config::ImageHostSettings, error::PassError};

pub const QR_FOLDER: &str = "wallet_qr";

/// Hosted path for an employee's QR image. Fixed per employee so re-issuing
/// overwrites the previous upload.
pub fn qr_public_id(emp_id: &str) -> String {
    format!("{emp_id}_qr")
}

/// Signature over the sorted upload parameters followed by the API secret.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{to_sign}{api_secret}")))
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Clone)]
pub struct ImageHost {
    client: Client,
    base_url: String,
    settings: ImageHostSettings,
}

impl ImageHost {
    pub fn new(client: Client, base_url: &str, settings: ImageHostSettings) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            settings,
        }
    }

    /// Upload a QR PNG for `emp_id` and return its public HTTPS URL.
    pub async fn upload_qr(
        &self,
        emp_id: &str,
        png: Vec<u8>,
        timestamp: u64,
    ) -> Result<String, PassError> {
        let public_id = qr_public_id(emp_id);

        let mut params = BTreeMap::new();
        params.insert("folder", QR_FOLDER.to_string());
        params.insert("overwrite", "true".to_string());
        params.insert("public_id", public_id.clone());
        params.insert("timestamp", timestamp.to_string());
        let signature = sign_params(&params, &self.settings.api_secret);

        let file = Part::bytes(png)
            .file_name(format!("{public_id}.png"))
            .mime_str("image/png")?;
        let form = params
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
            .text("api_key", self.settings.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .part("file", file);

        let url = format!(
            "{}/v1_1/{}/image/upload",
            self.base_url, self.settings.cloud_name
        );
        debug!(%url, %public_id, "uploading QR image");
        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PassError::ImageUploadRejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<UploadResponse>()
            .await?
            .secure_url
            .filter(|url| !url.is_empty())
            .ok_or(PassError::MissingImageUrl)
    }
}
