use std::sync::Arc;

use crate::config::AppConfig;
use crate::infra::github::GithubClient;
use crate::infra::lemonsqueezy::LemonSqueezyClient;
use crate::infra::openai::OpenAiClient;
use crate::services::{IssueTrackerService, LanguageModelService, LicenseService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub language_model: Arc<dyn LanguageModelService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub license: Arc<dyn LicenseService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        language_model: Arc<dyn LanguageModelService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
        license: Arc<dyn LicenseService>,
    ) -> Self {
        Self {
            config,
            language_model,
            issue_tracker,
            license,
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let language_model = Arc::new(OpenAiClient::new(config.openai_base_url.clone()));
        let issue_tracker = Arc::new(GithubClient::new(config.github_base_url.clone()));
        let license = Arc::new(LemonSqueezyClient::new(config.license_base_url.clone()));
        Self::new(config, language_model, issue_tracker, license)
    }
}
