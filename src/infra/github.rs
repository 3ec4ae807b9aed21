use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::credentials::TrackerCredentials;
use crate::domain::report::CreatedIssue;
use crate::error::{AppError, AppResult};
use crate::services::{IssueDraft, IssueTrackerService};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
const SERVICE: &str = "GitHub";
const AGENT: &str = concat!("storyscribe/", env!("CARGO_PKG_VERSION"));

pub struct GithubClient {
    http: Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn issues_endpoint(&self, repository: &str) -> String {
        format!(
            "{}/repos/{}/issues",
            self.base_url.trim_end_matches('/'),
            repository
        )
    }
}

#[async_trait]
impl IssueTrackerService for GithubClient {
    async fn create_issue(
        &self,
        credentials: &TrackerCredentials,
        draft: &IssueDraft,
    ) -> AppResult<CreatedIssue> {
        debug!(repository = %credentials.repository, title = %draft.title, "creating issue");

        let response = self
            .http
            .post(self.issues_endpoint(&credentials.repository))
            .header(AUTHORIZATION, format!("token {}", credentials.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, AGENT)
            .json(draft)
            .send()
            .await
            .map_err(|err| AppError::TransportFailure {
                service: SERVICE,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::RemoteRejection {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        // The status alone decides success; a body we cannot read only loses the link.
        let issue = match response.json::<GithubIssueResponse>().await {
            Ok(payload) => CreatedIssue {
                number: payload.number,
                url: payload.html_url,
            },
            Err(err) => {
                debug!(error = %err, "created issue but could not read response body");
                CreatedIssue::default()
            }
        };

        Ok(issue)
    }
}

#[derive(Deserialize)]
struct GithubIssueResponse {
    number: Option<u64>,
    html_url: Option<String>,
}
