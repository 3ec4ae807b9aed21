use std::sync::Arc;

use tracing::info;

use crate::capture::TranscriptExtractor;
use crate::context::AppContext;
use crate::domain::credentials::{ModelCredentials, TrackerCredentials};
use crate::domain::report::PublishReport;
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult, PipelineStage};
use crate::extraction::{ExtractionRequest, parse_tickets};
use crate::services::{DocumentSnapshot, IssueTrackerService, LanguageModelService};
use crate::workflow::publish::TicketPublisher;

/// Transcript-to-ticket pipeline. The only state kept between calls is the
/// last successful analysis, replaced wholesale each time.
pub struct Pipeline {
    extractor: TranscriptExtractor,
    language_model: Arc<dyn LanguageModelService>,
    publisher: TicketPublisher,
    model: Option<String>,
    last_batch: Option<Vec<Ticket>>,
}

impl Pipeline {
    pub fn new(
        language_model: Arc<dyn LanguageModelService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
    ) -> Self {
        Self {
            extractor: TranscriptExtractor::default(),
            language_model,
            publisher: TicketPublisher::new(issue_tracker),
            model: None,
            last_batch: None,
        }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        let pipeline = Self::new(ctx.language_model.clone(), ctx.issue_tracker.clone());
        match &ctx.config.openai_model {
            Some(model) => pipeline.with_model(model.clone()),
            None => pipeline,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub async fn analyze(
        &mut self,
        document: &dyn DocumentSnapshot,
        credentials: &ModelCredentials,
    ) -> AppResult<Vec<Ticket>> {
        let transcript = self.extractor.extract(document);
        self.analyze_transcript(&transcript, credentials).await
    }

    pub async fn analyze_transcript(
        &mut self,
        transcript: &str,
        credentials: &ModelCredentials,
    ) -> AppResult<Vec<Ticket>> {
        let mut request =
            ExtractionRequest::build(transcript).map_err(|err| err.at_stage(PipelineStage::Request))?;
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        let raw = self
            .language_model
            .complete(&request, credentials)
            .await
            .map_err(|err| err.at_stage(PipelineStage::Generation))?;

        let tickets = parse_tickets(&raw).map_err(|err| err.at_stage(PipelineStage::Parse))?;
        info!(count = tickets.len(), model = %request.model, "analysis produced tickets");

        self.last_batch = Some(tickets.clone());
        Ok(tickets)
    }

    pub fn last_batch(&self) -> Option<&[Ticket]> {
        self.last_batch.as_deref()
    }

    pub async fn publish_all(
        &self,
        tickets: &[Ticket],
        credentials: &TrackerCredentials,
    ) -> PublishReport {
        self.publisher.publish(tickets, credentials).await
    }

    /// Publishes the cached result of the last successful analysis.
    pub async fn publish_last(&self, credentials: &TrackerCredentials) -> AppResult<PublishReport> {
        let tickets = self.last_batch().ok_or_else(|| {
            AppError::EmptyInput("no analyzed tickets to publish".to_string())
        })?;
        Ok(self.publish_all(tickets, credentials).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::capture::tests::StaticDocument;
    use crate::domain::ticket::TicketKind;
    use crate::workflow::publish::tests::{RecordingTracker, credentials as tracker_credentials};

    /// Model double replaying canned replies in order.
    struct ScriptedModel {
        replies: Mutex<Vec<AppResult<String>>>,
        requests: Mutex<Vec<ExtractionRequest>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<AppResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModelService for ScriptedModel {
        async fn complete(
            &self,
            request: &ExtractionRequest,
            _credentials: &ModelCredentials,
        ) -> AppResult<String> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("[]".to_string()))
        }
    }

    fn model_credentials() -> ModelCredentials {
        ModelCredentials::new("sk-test")
    }

    fn pipeline(model: Arc<ScriptedModel>, tracker: Arc<RecordingTracker>) -> Pipeline {
        Pipeline::new(model, tracker)
    }

    const TWO_TICKETS: &str = r#"Here you go:
[{"type":"bug","title":"Export crashes","description":"Stack trace on click"},
 {"type":"story","title":"Bulk export","description":""}]"#;

    #[tokio::test]
    async fn analyzes_captured_transcript() {
        let model = ScriptedModel::new(vec![Ok(TWO_TICKETS.to_string())]);
        let mut pipeline = pipeline(model.clone(), Arc::default());
        let document = StaticDocument::default()
            .with(".transcript-message", &["Dana: export crashes", "Lee: add bulk export"]);

        let tickets = pipeline.analyze(&document, &model_credentials()).await.unwrap();

        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].kind, TicketKind::Bug);
        assert_eq!(pipeline.last_batch(), Some(tickets.as_slice()));

        let requests = model.requests.lock().unwrap();
        assert_eq!(
            requests[0].transcript,
            "Dana: export crashes\nLee: add bulk export"
        );
    }

    #[tokio::test]
    async fn empty_capture_fails_at_request_stage_without_calling_model() {
        let model = ScriptedModel::new(Vec::new());
        let mut pipeline = pipeline(model.clone(), Arc::default());

        let err = pipeline
            .analyze(&StaticDocument::default(), &model_credentials())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(PipelineStage::Request));
        assert!(matches!(err.root(), AppError::EmptyInput(_)));
        assert!(model.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn model_failure_is_tagged_as_generation() {
        let model = ScriptedModel::new(vec![Err(AppError::TransportFailure {
            service: "test",
            message: "connection reset".to_string(),
        })]);
        let mut pipeline = pipeline(model, Arc::default());

        let err = pipeline
            .analyze_transcript("notes", &model_credentials())
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(PipelineStage::Generation));
        assert!(matches!(err.root(), AppError::TransportFailure { .. }));
    }

    #[tokio::test]
    async fn parse_failures_are_tagged_and_keep_previous_batch() {
        let model = ScriptedModel::new(vec![
            Ok(TWO_TICKETS.to_string()),
            Ok("I could not find anything.".to_string()),
            Ok(r#"[{"type":"epic","title":"Z"}]"#.to_string()),
        ]);
        let mut pipeline = pipeline(model, Arc::default());

        let first = pipeline
            .analyze_transcript("notes", &model_credentials())
            .await
            .unwrap();

        let err = pipeline
            .analyze_transcript("notes", &model_credentials())
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Some(PipelineStage::Parse));
        assert!(matches!(err.root(), AppError::MalformedExtraction(_)));

        let err = pipeline
            .analyze_transcript("notes", &model_credentials())
            .await
            .unwrap_err();
        assert!(matches!(err.root(), AppError::InvalidTicketSchema { .. }));

        assert_eq!(pipeline.last_batch(), Some(first.as_slice()));
    }

    #[tokio::test]
    async fn new_analysis_replaces_cached_batch() {
        let model = ScriptedModel::new(vec![
            Ok(TWO_TICKETS.to_string()),
            Ok(r#"[{"type":"task","title":"Rotate keys"}]"#.to_string()),
        ]);
        let mut pipeline = pipeline(model, Arc::default());

        pipeline
            .analyze_transcript("first", &model_credentials())
            .await
            .unwrap();
        let second = pipeline
            .analyze_transcript("second", &model_credentials())
            .await
            .unwrap();

        assert_eq!(pipeline.last_batch(), Some(second.as_slice()));
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn configured_model_is_requested() {
        let model = ScriptedModel::new(Vec::new());
        let mut pipeline = pipeline(model.clone(), Arc::default()).with_model("gpt-4o");

        pipeline
            .analyze_transcript("notes", &model_credentials())
            .await
            .unwrap();

        assert_eq!(model.requests.lock().unwrap()[0].model, "gpt-4o");
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_cached_batch_in_order() {
        let model = ScriptedModel::new(vec![Ok(TWO_TICKETS.to_string())]);
        let tracker = Arc::new(RecordingTracker::default());
        let mut pipeline = pipeline(model, tracker.clone());

        pipeline
            .analyze_transcript("notes", &model_credentials())
            .await
            .unwrap();
        let report = pipeline.publish_last(&tracker_credentials()).await.unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 2);
        assert_eq!(tracker.titles(), ["Export crashes", "Bulk export"]);
    }

    #[tokio::test]
    async fn publishing_without_analysis_is_empty_input() {
        let pipeline = pipeline(ScriptedModel::new(Vec::new()), Arc::default());

        let err = pipeline
            .publish_last(&tracker_credentials())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EmptyInput(_)));
    }
}
