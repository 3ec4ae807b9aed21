use std::fmt;

use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketKind {
    Bug,
    Story,
    Task,
}

impl TicketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketKind::Bug => "bug",
            TicketKind::Story => "story",
            TicketKind::Task => "task",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "bug" => Some(TicketKind::Bug),
            "story" => Some(TicketKind::Story),
            "task" => Some(TicketKind::Task),
            _ => None,
        }
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated unit of extracted work. Only the response parser builds these
/// from model output; everything downstream reads them. Deserializing goes
/// through the same checks as [`Ticket::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketRecord")]
pub struct Ticket {
    pub kind: TicketKind,
    pub title: String,
    pub description: String,
}

impl Ticket {
    /// Checks the title contract and trims the title. The description is kept
    /// exactly as given.
    pub fn new(kind: TicketKind, title: &str, description: &str) -> Result<Self, String> {
        let title = title.trim();
        if title.is_empty() {
            return Err("title must not be empty".to_string());
        }
        let length = title.chars().count();
        if length > TITLE_MAX_CHARS {
            return Err(format!(
                "title is {length} characters, limit is {TITLE_MAX_CHARS}"
            ));
        }

        Ok(Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct TicketRecord {
    kind: TicketKind,
    title: String,
    #[serde(default)]
    description: String,
}

impl TryFrom<TicketRecord> for Ticket {
    type Error = String;

    fn try_from(record: TicketRecord) -> Result<Self, Self::Error> {
        Ticket::new(record.kind, &record.title, &record.description)
    }
}
