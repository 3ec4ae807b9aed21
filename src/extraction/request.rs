use serde::Serialize;

use crate::error::{AppError, AppResult};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const TEMPERATURE: f32 = 0.3;

pub const INSTRUCTIONS: &str = r#"Extract actionable tickets from meeting transcripts. For each item:
- type: "bug", "story", or "task"
- title: Clear, concise title
- description: Detailed description
Return only a JSON array and nothing else: [{"type":"bug","title":"...","description":"..."}]"#;

/// Everything the text-generation service needs for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRequest {
    pub model: String,
    pub temperature: f32,
    pub instructions: &'static str,
    pub transcript: String,
}

impl ExtractionRequest {
    /// Fails with `EmptyInput` on a blank transcript. The transcript is
    /// embedded verbatim, never split or trimmed.
    pub fn build(transcript: &str) -> AppResult<Self> {
        if transcript.trim().is_empty() {
            return Err(AppError::EmptyInput(
                "transcript is empty or whitespace".to_string(),
            ));
        }

        Ok(Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: TEMPERATURE,
            instructions: INSTRUCTIONS,
            transcript: transcript.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
