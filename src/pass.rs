use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    config::PassSettings,
    credentials::ServiceAccount,
    directory::EmployeeDirectory,
    error::PassError,
    image_host::ImageHost,
    notifier::{pass_email, Mailer},
    payload::SaveClaims,
    qr,
    shortener::Shortener,
    signer::{now_secs, save_url},
    types::{Employee, EmployeeID, WalletResult},
    wallet::WalletApi,
};

const GENERIC_FAILURE: &str = "Something went wrong";
const CLASS_CREATION_FAILURE: &str = "Failed to create genericClass";

#[derive(Clone)]
pub struct PassConfig {
    pub settings: PassSettings,
    pub directory: Arc<Mutex<dyn EmployeeDirectory>>,
    /// Transport for the final notification. Only its error is checked,
    /// delivery is not confirmed.
    pub mailer: Arc<dyn Mailer>,
}

/// Links and image produced by a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedPass {
    pub short_url: String,
    pub image_url: String,
    pub save_url: String,
}

pub(crate) struct PassInternal {
    config: PassConfig,
    client: Client,
}

impl PassInternal {
    pub async fn create_employee(&self, employee: &Employee) -> Result<(), PassError> {
        let inserted = self
            .config
            .directory
            .lock()
            .await
            .insert_employee(employee)
            .await?;

        if !inserted {
            return Err(PassError::EmployeeAlreadyExists);
        }

        info!(emp_id = %employee.emp_id, "employee created");
        Ok(())
    }

    pub async fn retrieve_employee(&self, emp_id: &EmployeeID) -> Result<Employee, PassError> {
        self.config
            .directory
            .lock()
            .await
            .retrieve_employee(emp_id)
            .await?
            .ok_or(PassError::EmployeeNotFound)
    }

    /// Run the whole issuance and fold any failure into a [`WalletResult`].
    pub async fn issue_pass(&self, employee: &Employee) -> WalletResult {
        let span = info_span!("issue_pass", issuance = %Uuid::new_v4(), emp_id = %employee.emp_id);

        async move {
            match self.run_workflow(employee).await {
                Ok(issued) => {
                    info!(short_url = %issued.short_url, image_url = %issued.image_url, "wallet pass issued");
                    WalletResult::issued(issued.short_url, issued.image_url)
                }
                Err(PassError::ClassCreationFailed { details }) => {
                    WalletResult::failed(CLASS_CREATION_FAILURE, details)
                }
                Err(err) => {
                    error!(error = %err, "wallet pass issuance failed");
                    WalletResult::failed(GENERIC_FAILURE, Value::String(err.to_string()))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_workflow(&self, employee: &Employee) -> Result<IssuedPass, PassError> {
        let settings = &self.config.settings;
        let endpoints = &settings.endpoints;

        let account = ServiceAccount::load(&settings.service_account_file)?;
        let signing_key = account.encoding_key()?;

        let access_token = account.fetch_access_token(&self.client, now_secs()).await?;
        WalletApi::new(self.client.clone(), &endpoints.wallet_api, access_token)
            .ensure_class(settings)
            .await?;

        let claims = SaveClaims::for_employee(settings, &account.client_email, employee, now_secs());
        let first_save_url = save_url(&claims, &signing_key, &endpoints.save)?;

        let short_url = Shortener::new(self.client.clone(), &endpoints.shortener)
            .shorten(&first_save_url)
            .await
            .into_url();

        let png = qr::render_png(&short_url)?;
        let image_url = ImageHost::new(
            self.client.clone(),
            &endpoints.image_host,
            settings.image_host.clone(),
        )
        .upload_qr(&employee.emp_id, png, now_secs())
        .await?;

        let claims = claims.with_qr_image(&image_url);
        let final_save_url = save_url(&claims, &signing_key, &endpoints.save)?;

        let email = pass_email(employee, &short_url, &final_save_url, &settings.from_email);
        self.config
            .mailer
            .send(&email)
            .await
            .map_err(|source| PassError::MailError { source })?;

        Ok(IssuedPass {
            short_url,
            image_url,
            save_url: final_save_url,
        })
    }
}

#[derive(Clone)]
pub struct Pass {
    pub(crate) internal: Arc<PassInternal>,
}

impl Pass {
    pub fn new(config: PassConfig) -> Result<Self, PassError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.settings.http_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            internal: Arc::new(PassInternal {
                config,
                client: builder.build()?,
            }),
        })
    }

    /// Issue (or re-issue) the wallet pass for an employee.
    pub async fn issue_pass(&self, employee: &Employee) -> WalletResult {
        self.internal.issue_pass(employee).await
    }
}
