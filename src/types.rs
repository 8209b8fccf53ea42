use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const MAX_EMP_ID_LEN: usize = 20;
const MAX_NAME_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 15;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EmployeeID(pub String);

/// An employee as held by the directory. Read-only once created.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Employee {
    pub emp_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Employee {
    pub fn id(&self) -> EmployeeID {
        EmployeeID(self.emp_id.clone())
    }
}

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Body of an intake request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewEmployee {
    #[serde(default)]
    pub emp_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl NewEmployee {
    /// Check the record against the directory's field constraints and
    /// produce a trimmed [`Employee`].
    pub fn validate(self) -> Result<Employee, FieldErrors> {
        let mut errors = FieldErrors::new();

        let emp_id = check_text(&mut errors, "emp_id", &self.emp_id, MAX_EMP_ID_LEN);
        let name = check_text(&mut errors, "name", &self.name, MAX_NAME_LEN);
        let phone = check_text(&mut errors, "phone", &self.phone, MAX_PHONE_LEN);

        let email = self.email.trim().to_string();
        if email.is_empty() {
            push_error(&mut errors, "email", "This field may not be blank.");
        } else if !looks_like_email(&email) {
            push_error(&mut errors, "email", "Enter a valid email address.");
        }

        if errors.is_empty() {
            Ok(Employee {
                emp_id,
                name,
                phone,
                email,
            })
        } else {
            Err(errors)
        }
    }
}

fn check_text(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        push_error(errors, field, "This field may not be blank.");
    } else if value.chars().count() > max_len {
        push_error(
            errors,
            field,
            &format!("Ensure this field has no more than {max_len} characters."),
        );
    }
    value.to_string()
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(is_domain_label)
}

// hostname label: alphanumerics and inner hyphens
fn is_domain_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_alphanumeric() || c == '-')
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Success,
}

/// Outcome of one run of the issuance workflow, as reported to callers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum WalletResult {
    Issued {
        status: IssueStatus,
        short_url: String,
        image_url: String,
        email_sent: bool,
    },
    Failed {
        error: String,
        details: Value,
    },
}

impl WalletResult {
    pub fn issued(short_url: String, image_url: String) -> Self {
        WalletResult::Issued {
            status: IssueStatus::Success,
            short_url,
            image_url,
            email_sent: true,
        }
    }

    pub fn failed(error: impl Into<String>, details: Value) -> Self {
        WalletResult::Failed {
            error: error.into(),
            details,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WalletResult::Issued { .. })
    }
}
