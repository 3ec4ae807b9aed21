use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::credentials::TrackerCredentials;
use crate::domain::report::{PublishOutcome, PublishReport};
use crate::domain::ticket::Ticket;
use crate::services::{IssueDraft, IssueTrackerService};

/// Fixed gap between consecutive create calls.
pub const PACING_INTERVAL: Duration = Duration::from_millis(300);
pub const ATTRIBUTION_FOOTER: &str = "\n\n---\n*Created by StoryScribe*";

pub fn issue_draft(ticket: &Ticket) -> IssueDraft {
    IssueDraft {
        title: ticket.title.clone(),
        body: format!("{}{ATTRIBUTION_FOOTER}", ticket.description),
        labels: vec![ticket.kind.as_str().to_string()],
    }
}

pub struct TicketPublisher {
    tracker: Arc<dyn IssueTrackerService>,
}

impl TicketPublisher {
    pub fn new(tracker: Arc<dyn IssueTrackerService>) -> Self {
        Self { tracker }
    }

    /// Creates one issue per ticket, strictly in order. A failed call is
    /// recorded in the report and never stops the batch.
    pub async fn publish(
        &self,
        tickets: &[Ticket],
        credentials: &TrackerCredentials,
    ) -> PublishReport {
        let mut outcomes = Vec::with_capacity(tickets.len());

        for (position, ticket) in tickets.iter().enumerate() {
            if position > 0 {
                tokio::time::sleep(PACING_INTERVAL).await;
            }

            let draft = issue_draft(ticket);
            let outcome = match self.tracker.create_issue(credentials, &draft).await {
                Ok(issue) => {
                    info!(position, title = %ticket.title, url = ?issue.url, "issue created");
                    PublishOutcome::created(ticket.clone(), issue)
                }
                Err(err) => {
                    warn!(position, title = %ticket.title, error = %err, "issue creation failed");
                    PublishOutcome::failed(ticket.clone(), err.to_string())
                }
            };
            outcomes.push(outcome);
        }

        let report = PublishReport::from_outcomes(outcomes);
        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            repository = %credentials.repository,
            "publish finished"
        );
        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::domain::report::CreatedIssue;
    use crate::domain::ticket::TicketKind;
    use crate::error::{AppError, AppResult};

    /// Tracker double that records every call and fails the listed positions.
    #[derive(Default)]
    pub(crate) struct RecordingTracker {
        pub calls: Mutex<Vec<(Instant, IssueDraft)>>,
        pub fail_at: HashSet<usize>,
    }

    impl RecordingTracker {
        pub(crate) fn failing_at(positions: &[usize]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: positions.iter().copied().collect(),
            }
        }

        pub(crate) fn titles(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, draft)| draft.title.clone())
                .collect()
        }
    }

    #[async_trait]
    impl IssueTrackerService for RecordingTracker {
        async fn create_issue(
            &self,
            _credentials: &TrackerCredentials,
            draft: &IssueDraft,
        ) -> AppResult<CreatedIssue> {
            let position = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((Instant::now(), draft.clone()));
                calls.len() - 1
            };

            if self.fail_at.contains(&position) {
                return Err(AppError::RemoteRejection {
                    service: "test",
                    status: 422,
                    body: "Validation Failed".to_string(),
                });
            }

            Ok(CreatedIssue {
                number: Some(position as u64 + 1),
                url: None,
            })
        }
    }

    pub(crate) fn credentials() -> TrackerCredentials {
        TrackerCredentials::new("ghp_test", "acme/widgets").unwrap()
    }

    pub(crate) fn tickets() -> Vec<Ticket> {
        vec![
            Ticket::new(TicketKind::Bug, "Export crashes", "Clicking export throws").unwrap(),
            Ticket::new(TicketKind::Story, "Bulk export", "").unwrap(),
            Ticket::new(TicketKind::Task, "Rotate keys", "Quarterly rotation").unwrap(),
        ]
    }

    #[test]
    fn draft_carries_footer_and_kind_label() {
        let draft = issue_draft(&tickets()[0]);

        assert_eq!(draft.title, "Export crashes");
        assert_eq!(
            draft.body,
            "Clicking export throws\n\n---\n*Created by StoryScribe*"
        );
        assert_eq!(draft.labels, vec!["bug".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn mid_batch_failure_does_not_abort() {
        let tracker = Arc::new(RecordingTracker::failing_at(&[1]));
        let publisher = TicketPublisher::new(tracker.clone());

        let report = publisher.publish(&tickets(), &credentials()).await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert!(report.outcomes[0].succeeded);
        assert!(!report.outcomes[1].succeeded);
        assert!(report.outcomes[2].succeeded);
        assert!(
            report.outcomes[1]
                .failure
                .as_deref()
                .is_some_and(|reason| reason.contains("422"))
        );
        assert_eq!(
            tracker.titles(),
            ["Export crashes", "Bulk export", "Rotate keys"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn calls_are_paced() {
        let tracker = Arc::new(RecordingTracker::failing_at(&[0]));
        let publisher = TicketPublisher::new(tracker.clone());

        publisher.publish(&tickets(), &credentials()).await;

        let calls = tracker.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= PACING_INTERVAL);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_batch_makes_no_calls() {
        let tracker = Arc::new(RecordingTracker::default());
        let publisher = TicketPublisher::new(tracker.clone());

        let report = publisher.publish(&[], &credentials()).await;

        assert_eq!(report.attempted, 0);
        assert!(tracker.calls.lock().unwrap().is_empty());
    }
}
