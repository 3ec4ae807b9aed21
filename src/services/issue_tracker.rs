use async_trait::async_trait;
use serde::Serialize;

use crate::domain::credentials::TrackerCredentials;
use crate::domain::report::CreatedIssue;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn create_issue(
        &self,
        credentials: &TrackerCredentials,
        draft: &IssueDraft,
    ) -> AppResult<CreatedIssue>;
}
