use std::error::Error;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{config::MailRelaySettings, types::Employee};

pub const PASS_EMAIL_SUBJECT: &str = "Your Google Wallet Pass is Ready";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    #[serde(rename = "text")]
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Hand the message to the transport. Success means it was accepted,
    /// not that it was delivered.
    async fn send(&self, email: &Email) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Build the plain-text pass notification for an employee.
pub fn pass_email(employee: &Employee, short_url: &str, save_url: &str, from: &str) -> Email {
    let body = format!(
        "Hi {name},\n\
         \n\
         Your digital employee pass is ready. Open this link on your phone to add it to Google Wallet:\n\
         \n\
         {short_url}\n\
         \n\
         If the short link does not work, use the full save link instead:\n\
         \n\
         {save_url}\n\
         \n\
         Thank you,\n\
         Convergint Team\n",
        name = employee.name,
    );

    Email {
        from: from.to_string(),
        to: vec![employee.email.clone()],
        subject: PASS_EMAIL_SUBJECT.to_string(),
        body,
    }
}

/// Sends mail through an HTTP relay that accepts
/// `{from, to, subject, text}` as JSON with a bearer API key.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    settings: MailRelaySettings,
}

impl HttpMailer {
    pub fn new(client: Client, settings: MailRelaySettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .post(&self.settings.url)
            .bearer_auth(&self.settings.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("mail relay responded with status {status}: {body}").into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::test_support::jane;

    #[test]
    fn email_mentions_name_and_links() {
        let email = pass_email(
            &jane(),
            "https://tinyurl.com/abc",
            "https://pay.google.com/gp/v/save/t.o.k",
            "passes@example.com",
        );

        assert_eq!(email.subject, PASS_EMAIL_SUBJECT);
        assert_eq!(email.from, "passes@example.com");
        assert_eq!(email.to, vec!["jane@x.com".to_string()]);
        assert!(email.body.starts_with("Hi Jane Doe,"));
        assert!(email.body.contains("https://tinyurl.com/abc"));
        assert!(email.body.contains("https://pay.google.com/gp/v/save/t.o.k"));
    }

    #[tokio::test]
    async fn relay_receives_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/send")
            .match_header("authorization", "Bearer relay-key")
            .match_body(Matcher::Json(json!({
                "from": "passes@example.com",
                "to": ["jane@x.com"],
                "subject": "hello",
                "text": "body"
            })))
            .with_status(202)
            .expect(1)
            .create_async()
            .await;

        let mailer = HttpMailer::new(
            Client::new(),
            MailRelaySettings {
                url: format!("{}/send", server.url()),
                api_key: "relay-key".into(),
            },
        );
        let email = Email {
            from: "passes@example.com".into(),
            to: vec!["jane@x.com".into()],
            subject: "hello".into(),
            body: "body".into(),
        };

        mailer.send(&email).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn relay_refusal_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/send")
            .with_status(500)
            .with_body("relay down")
            .create_async()
            .await;

        let mailer = HttpMailer::new(
            Client::new(),
            MailRelaySettings {
                url: format!("{}/send", server.url()),
                api_key: "relay-key".into(),
            },
        );
        let email = pass_email(&jane(), "a", "b", "passes@example.com");

        let err = mailer.send(&email).await.unwrap_err();
        assert!(err.to_string().contains("relay down"));
    }
}
