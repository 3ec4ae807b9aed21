use async_trait::async_trait;

use crate::domain::credentials::ModelCredentials;
use crate::error::AppResult;
use crate::extraction::request::ExtractionRequest;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Sends the request and returns the raw, unparsed model text.
    async fn complete(
        &self,
        request: &ExtractionRequest,
        credentials: &ModelCredentials,
    ) -> AppResult<String>;
}
