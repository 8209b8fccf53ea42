use std::path::PathBuf;

use serde_json::Value;
use warp::reject::Reject;

use crate::types::FieldErrors;

#[derive(thiserror::Error, Debug)]
pub enum PassError {
    #[error("an employee with that id already exists")]
    EmployeeAlreadyExists,
    #[error("employee not found")]
    EmployeeNotFound,
    #[error("invalid employee record")]
    InvalidEmployee(FieldErrors),
    #[error("error during directory operation")]
    DirectoryError {
        #[from]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),
    #[error("invalid configuration value {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },
    #[error("could not read service account file {}: {source}", .path.display())]
    CredentialsUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid service account file: {source}")]
    CredentialsInvalid { source: serde_json::Error },
    #[error("access token request failed with status {status}: {body}")]
    AccessTokenRejected { status: u16, body: String },
    #[error("Failed to create genericClass")]
    ClassCreationFailed { details: Value },
    #[error("error signing token: {source}")]
    SigningError {
        #[from]
        source: jsonwebtoken::errors::Error,
    },
    #[error("error rendering QR code: {0}")]
    QrRenderError(String),
    #[error("image upload failed with status {status}: {body}")]
    ImageUploadRejected { status: u16, body: String },
    #[error("image host response did not include a secure_url")]
    MissingImageUrl,
    #[error("error sending email: {source}")]
    MailError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("HTTP request failed: {source}")]
    HttpError {
        #[from]
        source: reqwest::Error,
    },
}

impl Reject for PassError {}
