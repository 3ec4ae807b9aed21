use serde::Deserialize;
use serde_json::Value;

use crate::domain::ticket::{Ticket, TicketKind};
use crate::error::{AppError, AppResult};

#[derive(Deserialize)]
struct RawTicket {
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Greedy span from the first `[` to the last `]`.
fn array_span(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (end > start).then(|| &raw[start..=end])
}

/// Turns raw model text into tickets, tolerating commentary around the array.
/// A single invalid element rejects the whole batch.
pub fn parse_tickets(raw: &str) -> AppResult<Vec<Ticket>> {
    let span = array_span(raw).ok_or_else(|| {
        AppError::MalformedExtraction("response contains no JSON array".to_string())
    })?;

    let items: Vec<Value> = serde_json::from_str(span).map_err(|err| {
        AppError::MalformedExtraction(format!("response array is not valid JSON: {err}"))
    })?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| validate(index, item))
        .collect()
}

fn validate(index: usize, item: Value) -> AppResult<Ticket> {
    let invalid = |reason: String| AppError::InvalidTicketSchema { index, reason };

    let raw: RawTicket = serde_json::from_value(item).map_err(|err| invalid(err.to_string()))?;

    let kind = raw.kind.ok_or_else(|| invalid("missing type".to_string()))?;
    let kind = TicketKind::from_str(&kind)
        .ok_or_else(|| invalid(format!("type '{kind}' is not bug, story or task")))?;
    let title = raw.title.ok_or_else(|| invalid("missing title".to_string()))?;
    let description = raw.description.unwrap_or_default();

    Ticket::new(kind, &title, &description).map_err(invalid)
}
