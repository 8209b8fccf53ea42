use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{config::PassSettings, error::PassError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassStatus {
    Existing,
    Created,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenericClass<'a> {
    id: &'a str,
    issuer_name: &'a str,
    review_status: &'a str,
    hex_background_color: &'a str,
    logo: Logo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Logo<'a> {
    source_uri: SourceUri<'a>,
}

#[derive(Debug, Serialize)]
struct SourceUri<'a> {
    uri: &'a str,
}

/// Client for the wallet provider's generic class endpoints.
#[derive(Clone)]
pub struct WalletApi {
    client: Client,
    base_url: String,
    access_token: String,
}

impl WalletApi {
    pub fn new(client: Client, base_url: &str, access_token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn class_collection_url(&self) -> String {
        format!("{}/walletobjects/v1/genericClass", self.base_url)
    }

    /// Make sure the pass class exists, creating it when the provider
    /// reports it missing. Any other check status is assumed to mean the
    /// class is already there.
    pub async fn ensure_class(&self, settings: &PassSettings) -> Result<ClassStatus, PassError> {
        let full_class_id = settings.full_class_id();
        let url = format!("{}/{}", self.class_collection_url(), full_class_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                self.create_class(settings, &full_class_id).await?;
                Ok(ClassStatus::Created)
            }
            status if status.is_success() => Ok(ClassStatus::Existing),
            status => {
                warn!(
                    status = status.as_u16(),
                    %url,
                    "unexpected class check status, issuing anyway"
                );
                Ok(ClassStatus::Existing)
            }
        }
    }

    async fn create_class(&self, settings: &PassSettings, full_class_id: &str) -> Result<(), PassError> {
        let class = GenericClass {
            id: full_class_id,
            issuer_name: &settings.issuer_name,
            review_status: "underReview",
            hex_background_color: &settings.background_color,
            logo: Logo {
                source_uri: SourceUri {
                    uri: &settings.logo_uri,
                },
            },
        };

        let response = self
            .client
            .post(self.class_collection_url())
            .bearer_auth(&self.access_token)
            .json(&class)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let details = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            error!(status = status.as_u16(), %details, "wallet class creation refused");
            return Err(PassError::ClassCreationFailed { details });
        }

        info!(class_id = %full_class_id, "created wallet class");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::test_support::test_settings;

    const CLASS_PATH: &str = "/walletobjects/v1/genericClass/3388000000022.employee_pass";

    #[tokio::test]
    async fn existing_class_is_left_alone() {
        let mut server = Server::new_async().await;
        let check = server
            .mock("GET", CLASS_PATH)
            .match_header("authorization", "Bearer ya29.test")
            .with_status(200)
            .with_body(r#"{"id": "3388000000022.employee_pass"}"#)
            .expect(1)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/walletobjects/v1/genericClass")
            .expect(0)
            .create_async()
            .await;

        let api = WalletApi::new(Client::new(), &server.url(), "ya29.test".into());
        let status = api.ensure_class(&test_settings()).await.unwrap();

        assert_eq!(status, ClassStatus::Existing);
        check.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn missing_class_is_created_once() {
        let mut server = Server::new_async().await;
        let _check = server
            .mock("GET", CLASS_PATH)
            .with_status(404)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/walletobjects/v1/genericClass")
            .match_header("authorization", "Bearer ya29.test")
            .match_body(Matcher::Json(json!({
                "id": "3388000000022.employee_pass",
                "issuerName": "Convergint",
                "reviewStatus": "underReview",
                "hexBackgroundColor": "#FFC0CB",
                "logo": { "sourceUri": { "uri": "https://cdn.example.com/logo.png" } }
            })))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let api = WalletApi::new(Client::new(), &server.url(), "ya29.test".into());
        let status = api.ensure_class(&test_settings()).await.unwrap();

        assert_eq!(status, ClassStatus::Created);
        create.assert_async().await;
    }

    #[tokio::test]
    async fn refused_creation_carries_provider_body() {
        let mut server = Server::new_async().await;
        let _check = server
            .mock("GET", CLASS_PATH)
            .with_status(404)
            .create_async()
            .await;
        let _create = server
            .mock("POST", "/walletobjects/v1/genericClass")
            .with_status(400)
            .with_body(r#"{"error": {"code": 400, "message": "Invalid issuer"}}"#)
            .create_async()
            .await;

        let api = WalletApi::new(Client::new(), &server.url(), "ya29.test".into());
        let err = api.ensure_class(&test_settings()).await.unwrap_err();

        match err {
            PassError::ClassCreationFailed { details } => {
                assert_eq!(details["error"]["message"], "Invalid issuer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unexpected_check_status_does_not_create() {
        let mut server = Server::new_async().await;
        let check = server
            .mock("GET", CLASS_PATH)
            .with_status(503)
            .expect(1)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/walletobjects/v1/genericClass")
            .expect(0)
            .create_async()
            .await;

        let api = WalletApi::new(Client::new(), &server.url(), "ya29.test".into());
        let status = api.ensure_class(&test_settings()).await.unwrap();

        assert_eq!(status, ClassStatus::Existing);
        check.assert_async().await;
        create.assert_async().await;
    }
}
