use serde::Serialize;

use crate::domain::ticket::Ticket;

/// What the tracker handed back for a created issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatedIssue {
    pub number: Option<u64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub ticket: Ticket,
    pub succeeded: bool,
    pub issue: Option<CreatedIssue>,
    pub failure: Option<String>,
}

impl PublishOutcome {
    pub fn created(ticket: Ticket, issue: CreatedIssue) -> Self {
        Self {
            ticket,
            succeeded: true,
            issue: Some(issue),
            failure: None,
        }
    }

    pub fn failed(ticket: Ticket, reason: String) -> Self {
        Self {
            ticket,
            succeeded: false,
            issue: None,
            failure: Some(reason),
        }
    }
}

/// Itemised result of one publish run, outcomes in input order.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub outcomes: Vec<PublishOutcome>,
    pub attempted: usize,
    pub succeeded: usize,
}

impl PublishReport {
    pub fn from_outcomes(outcomes: Vec<PublishOutcome>) -> Self {
        let attempted = outcomes.len();
        let succeeded = outcomes.iter().filter(|outcome| outcome.succeeded).count();
        Self {
            outcomes,
            attempted,
            succeeded,
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::TicketKind;

    fn ticket(title: &str) -> Ticket {
        Ticket::new(TicketKind::Task, title, "").unwrap()
    }

    #[test]
    fn counts_outcomes() {
        let report = PublishReport::from_outcomes(vec![
            PublishOutcome::created(ticket("a"), CreatedIssue::default()),
            PublishOutcome::failed(ticket("b"), "boom".to_string()),
            PublishOutcome::created(ticket("c"), CreatedIssue::default()),
        ]);

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.outcomes[1].failure.as_deref(), Some("boom"));
    }

    #[test]
    fn empty_report() {
        let report = PublishReport::from_outcomes(Vec::new());
        assert_eq!(report.attempted, 0);
        assert_eq!(report.succeeded, 0);
    }
}
