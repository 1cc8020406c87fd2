use std::fmt;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde_json::json;

use crate::models::signup::SignupResponse;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

lazy_static! {
    // Loose format check: something@something.something, no whitespace.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Submit failures as shown to the user: one coarse message per outcome,
/// replacing any previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    InvalidEmail,
    Submission,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::InvalidEmail => write!(f, "Please enter a valid email address."),
            SubmitError::Submission => {
                write!(f, "There was an issue submitting your email. Please try again.")
            }
        }
    }
}

impl std::error::Error for SubmitError {}

/// The signup form's submit flow: local format validation, a best-effort
/// insert into the structured-storage collaborator, then the webhook POST
/// that actually decides success.
#[derive(Clone)]
pub struct SignupForm {
    client: Client,
    storage_url: Option<String>,
    webhook_url: String,
}

impl SignupForm {
    pub fn new(
        storage_url: Option<String>,
        webhook_url: String,
        timeout_secs: u64,
    ) -> Result<Self, BoxError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            storage_url,
            webhook_url,
        })
    }

    /// Submit an email. Invalid addresses are rejected before any network
    /// call. On success, returns the server-reported eligibility when the
    /// webhook response carries one.
    pub async fn submit(&self, email: &str) -> Result<Option<bool>, SubmitError> {
        if !is_valid_email(email) {
            return Err(SubmitError::InvalidEmail);
        }

        // Storage insert is best-effort: log and keep going.
        if let Some(url) = &self.storage_url {
            match self
                .client
                .post(url)
                .json(&json!({ "email": email }))
                .send()
                .await
            {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!("Storage insert failed: {}", response.status());
                }
                Err(err) => {
                    tracing::warn!("Storage insert failed: {}", err);
                }
                Ok(_) => {}
            }
        }

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Form submission error: {}", err);
                SubmitError::Submission
            })?;

        if !response.status().is_success() {
            tracing::error!("Form submission error: HTTP {}", response.status());
            return Err(SubmitError::Submission);
        }

        // The webhook may be the counter function; surface its eligibility
        // verdict when the body has one, otherwise report nothing.
        let eligible = response
            .json::<SignupResponse>()
            .await
            .ok()
            .map(|body| body.eligible);

        Ok(eligible)
    }
}
