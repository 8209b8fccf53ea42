use serde::{Deserialize, Serialize};

use crate::{config::PassSettings, types::Employee};

pub const SAVE_AUDIENCE: &str = "google";
pub const SAVE_TYPE: &str = "savetowallet";
pub const TOKEN_LIFETIME_SECS: u64 = 3600;
const LANGUAGE: &str = "en-US";

/// Wallet object id for an employee: `<issuer_id>.<emp_id>` with spaces
/// replaced, so re-issuing targets the same object.
pub fn object_id(issuer_id: &str, emp_id: &str) -> String {
    format!("{}.{}", issuer_id, emp_id.replace(' ', "_"))
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SaveClaims {
    pub iss: String,
    pub aud: String,
    pub typ: String,
    pub iat: u64,
    pub exp: u64,
    pub payload: SavePayload,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub generic_objects: Vec<GenericObject>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenericObject {
    pub id: String,
    pub class_id: String,
    pub card_title: LocalizedString,
    pub header: LocalizedString,
    pub text_modules_data: Vec<TextModule>,
    pub hero_image: Image,
    pub image_modules_data: Vec<ImageModule>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedString {
    pub default_value: TranslatedString,
}

impl LocalizedString {
    fn en(value: &str) -> Self {
        Self {
            default_value: TranslatedString {
                language: LANGUAGE.into(),
                value: value.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TranslatedString {
    pub language: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TextModule {
    pub header: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub source_uri: ImageUri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<LocalizedString>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ImageUri {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageModule {
    pub main_image: Image,
}

impl SaveClaims {
    /// Build the first-pass claims. The QR slot carries the default hero
    /// image until a hosted QR exists.
    pub fn for_employee(
        settings: &PassSettings,
        service_account_email: &str,
        employee: &Employee,
        iat: u64,
    ) -> Self {
        let text_modules_data = [
            ("Name", &employee.name),
            ("Employee ID", &employee.emp_id),
            ("Phone", &employee.phone),
            ("Email", &employee.email),
        ]
        .into_iter()
        .map(|(header, body)| TextModule {
            header: header.into(),
            body: body.clone(),
        })
        .collect();

        let object = GenericObject {
            id: object_id(&settings.issuer_id, &employee.emp_id),
            class_id: settings.full_class_id(),
            card_title: LocalizedString::en(&employee.name),
            header: LocalizedString::en(&employee.emp_id),
            text_modules_data,
            hero_image: Image {
                source_uri: ImageUri {
                    uri: settings.default_hero_image.clone(),
                },
                content_description: None,
            },
            image_modules_data: vec![ImageModule {
                main_image: Image {
                    source_uri: ImageUri {
                        uri: settings.default_hero_image.clone(),
                    },
                    content_description: Some(LocalizedString::en(&settings.image_description)),
                },
            }],
        };

        Self {
            iss: service_account_email.into(),
            aud: SAVE_AUDIENCE.into(),
            typ: SAVE_TYPE.into(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
            payload: SavePayload {
                generic_objects: vec![object],
            },
        }
    }

    /// Same claims, same validity window, with the QR slot pointing at the
    /// hosted image.
    pub fn with_qr_image(mut self, image_url: &str) -> Self {
        for object in &mut self.payload.generic_objects {
            for module in &mut object.image_modules_data {
                module.main_image.source_uri.uri = image_url.into();
            }
        }
        self
    }

    pub fn qr_image_uri(&self) -> Option<&str> {
        self.payload
            .generic_objects
            .first()
            .and_then(|object| object.image_modules_data.first())
            .map(|module| module.main_image.source_uri.uri.as_str())
    }
}
