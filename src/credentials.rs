use std::{fs, path::Path};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PassError;

pub const WALLET_ISSUER_SCOPE: &str = "https://www.googleapis.com/auth/wallet_object.issuer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.into()
}

/// The subset of a service account key file the workflow needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccount {
    pub fn load(path: &Path) -> Result<Self, PassError> {
        let raw = fs::read_to_string(path).map_err(|source| PassError::CredentialsUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| PassError::CredentialsInvalid { source })
    }

    pub fn encoding_key(&self) -> Result<EncodingKey, PassError> {
        Ok(EncodingKey::from_rsa_pem(self.private_key.as_bytes())?)
    }

    /// Exchange a signed assertion for an OAuth access token scoped to the
    /// wallet issuer API.
    pub async fn fetch_access_token(&self, client: &Client, now: u64) -> Result<String, PassError> {
        let assertion = self.assertion(now)?;

        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PassError::AccessTokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = response.json::<TokenResponse>().await?;
        Ok(token.access_token)
    }

    fn assertion(&self, now: u64) -> Result<String, PassError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: WALLET_ISSUER_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        Ok(encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key()?,
        )?)
    }
}
