use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::{LicenseService, LicenseStatus};

pub const DEFAULT_BASE_URL: &str = "https://api.lemonsqueezy.com";
const SERVICE: &str = "LemonSqueezy";
const MIN_KEY_CHARS: usize = 11;

pub struct LemonSqueezyClient {
    http: Client,
    base_url: String,
}

impl LemonSqueezyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn validate_endpoint(&self) -> String {
        format!(
            "{}/v1/licenses/validate",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LicenseService for LemonSqueezyClient {
    async fn validate(&self, license_key: &str) -> AppResult<LicenseStatus> {
        let license_key = license_key.trim();
        if license_key.chars().count() < MIN_KEY_CHARS {
            return Ok(LicenseStatus {
                valid: false,
                error: Some("license key is too short".to_string()),
            });
        }

        let response = self
            .http
            .post(self.validate_endpoint())
            .header(ACCEPT, "application/json")
            .json(&ValidateRequest { license_key })
            .send()
            .await
            .map_err(|err| AppError::TransportFailure {
                service: SERVICE,
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());

        // Unknown keys come back as 4xx with a regular validation payload.
        match serde_json::from_str::<ValidateResponse>(&body) {
            Ok(payload) => Ok(LicenseStatus {
                valid: payload.valid,
                error: payload.error,
            }),
            Err(_) => Err(AppError::RemoteRejection {
                service: SERVICE,
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[derive(Serialize)]
struct ValidateRequest<'a> {
    license_key: &'a str,
}

#[derive(Deserialize)]
struct ValidateResponse {
    valid: bool,
    error: Option<String>,
}
