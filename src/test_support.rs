use std::{io::Write, time::Duration};

use serde_json::json;
use tempfile::NamedTempFile;

use crate::{
    config::{Endpoints, ImageHostSettings, PassSettings},
    types::Employee,
};

pub const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_key.pem");
pub const TEST_PUBLIC_KEY: &str = include_str!("../tests/fixtures/test_key.pub.pem");

pub fn write_service_account(token_uri: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let body = json!({
        "type": "service_account",
        "client_email": "issuer@wallet-test.iam.gserviceaccount.com",
        "private_key": TEST_PRIVATE_KEY,
        "token_uri": token_uri,
    });
    file.write_all(body.to_string().as_bytes()).unwrap();
    file
}

pub fn test_settings() -> PassSettings {
    PassSettings {
        service_account_file: "/nonexistent/service-account.json".into(),
        issuer_id: "3388000000022".into(),
        class_id: "employee_pass".into(),
        issuer_name: "Convergint".into(),
        background_color: "#FFC0CB".into(),
        logo_uri: "https://cdn.example.com/logo.png".into(),
        image_description: "Convergint Logo".into(),
        default_hero_image: "https://cdn.example.com/hero.png".into(),
        from_email: "passes@example.com".into(),
        image_host: ImageHostSettings {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "shh".into(),
        },
        endpoints: Endpoints::default(),
        http_timeout: Some(Duration::from_secs(5)),
    }
}

pub fn jane() -> Employee {
    Employee {
        emp_id: "E100".into(),
        name: "Jane Doe".into(),
        phone: "555-1234".into(),
        email: "jane@x.com".into(),
    }
}
