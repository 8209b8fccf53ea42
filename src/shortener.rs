use reqwest::Client;
use tracing::{debug, warn};

/// What the shortener produced for a save link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortLink {
    Shortened(String),
    /// The shortener was unavailable; the original link is used as-is.
    Unshortened(String),
}

impl ShortLink {
    pub fn as_str(&self) -> &str {
        match self {
            ShortLink::Shortened(url) | ShortLink::Unshortened(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            ShortLink::Shortened(url) | ShortLink::Unshortened(url) => url,
        }
    }
}

#[derive(Clone)]
pub struct Shortener {
    client: Client,
    base_url: String,
}

impl Shortener {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Never fails: any problem with the shortening service degrades to the
    /// long URL.
    pub async fn shorten(&self, long_url: &str) -> ShortLink {
        let request = self
            .client
            .get(format!("{}/api-create.php", self.base_url))
            .query(&[("url", long_url)]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "link shortener unreachable, using long url");
                return ShortLink::Unshortened(long_url.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "link shortener refused, using long url");
            return ShortLink::Unshortened(long_url.to_string());
        }

        match response.text().await {
            Ok(body) if !body.trim().is_empty() => {
                let short = body.trim().to_string();
                debug!(short_url = %short, "link shortened");
                ShortLink::Shortened(short)
            }
            Ok(_) => {
                warn!("link shortener returned an empty body, using long url");
                ShortLink::Unshortened(long_url.to_string())
            }
            Err(err) => {
                warn!(error = %err, "could not read shortener response, using long url");
                ShortLink::Unshortened(long_url.to_string())
            }
        }
    }
}
