use std::{env, path::PathBuf, time::Duration};

use crate::error::PassError;

pub const DEFAULT_WALLET_API: &str = "https://walletobjects.googleapis.com";
pub const DEFAULT_SAVE_ENDPOINT: &str = "https://pay.google.com/gp/v/save";
pub const DEFAULT_SHORTENER: &str = "https://tinyurl.com";
pub const DEFAULT_IMAGE_HOST: &str = "https://api.cloudinary.com";

/// Base URLs of the external services the workflow talks to.
#[derive(Clone, Debug)]
pub struct Endpoints {
    pub wallet_api: String,
    /// Save links are formed as `<save>/<token>`.
    pub save: String,
    pub shortener: String,
    pub image_host: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            wallet_api: DEFAULT_WALLET_API.into(),
            save: DEFAULT_SAVE_ENDPOINT.into(),
            shortener: DEFAULT_SHORTENER.into(),
            image_host: DEFAULT_IMAGE_HOST.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImageHostSettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Clone, Debug)]
pub struct MailRelaySettings {
    pub url: String,
    pub api_key: String,
}

impl MailRelaySettings {
    pub fn from_env() -> Result<Self, PassError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            url: required("MAIL_RELAY_URL")?,
            api_key: required("MAIL_RELAY_API_KEY")?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PassSettings {
    /// Path to the service account JSON holding the signing key and the
    /// issuer identity. Read fresh on every issuance.
    pub service_account_file: PathBuf,
    pub issuer_id: String,
    pub class_id: String,
    /// Shown on the pass class; only used when the class has to be created.
    pub issuer_name: String,
    pub background_color: String,
    pub logo_uri: String,
    /// Content description attached to the image module on each pass.
    pub image_description: String,
    pub default_hero_image: String,
    pub from_email: String,
    pub image_host: ImageHostSettings,
    pub endpoints: Endpoints,
    /// Applied to every outbound request when set.
    pub http_timeout: Option<Duration>,
}

impl PassSettings {
    /// Load settings from the process environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self, PassError> {
        dotenvy::dotenv().ok();

        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            wallet_api: optional("WALLET_API_BASE").unwrap_or(defaults.wallet_api),
            save: optional("WALLET_SAVE_ENDPOINT").unwrap_or(defaults.save),
            shortener: optional("SHORTENER_BASE").unwrap_or(defaults.shortener),
            image_host: optional("IMAGE_HOST_BASE").unwrap_or(defaults.image_host),
        };

        let http_timeout = optional("HTTP_TIMEOUT_SECS")
            .map(|secs| {
                secs.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| PassError::InvalidConfig {
                        name: "HTTP_TIMEOUT_SECS",
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            service_account_file: required("WALLET_SERVICE_ACCOUNT_FILE")?.into(),
            issuer_id: required("WALLET_ISSUER_ID")?,
            class_id: required("WALLET_CLASS_ID")?,
            issuer_name: optional("WALLET_ISSUER_NAME").unwrap_or_else(|| "Convergint".into()),
            background_color: optional("WALLET_BACKGROUND_COLOR")
                .unwrap_or_else(|| "#FFC0CB".into()),
            logo_uri: required("WALLET_LOGO_URI")?,
            image_description: optional("WALLET_IMAGE_DESCRIPTION")
                .unwrap_or_else(|| "Convergint Logo".into()),
            default_hero_image: required("WALLET_DEFAULT_HERO_IMAGE")?,
            from_email: required("DEFAULT_FROM_EMAIL")?,
            image_host: ImageHostSettings {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
            },
            endpoints,
            http_timeout,
        })
    }

    /// `<issuer_id>.<class_id>`
    pub fn full_class_id(&self) -> String {
        format!("{}.{}", self.issuer_id, self.class_id)
    }
}

fn required(name: &'static str) -> Result<String, PassError> {
    optional(name).ok_or(PassError::MissingConfig(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
