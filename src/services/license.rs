use async_trait::async_trait;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseStatus {
    pub valid: bool,
    pub error: Option<String>,
}

#[async_trait]
pub trait LicenseService: Send + Sync {
    async fn validate(&self, license_key: &str) -> AppResult<LicenseStatus>;
}
