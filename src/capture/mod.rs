pub mod buffer;
pub mod html;

use serde::Serialize;
use tracing::debug;

use crate::services::DocumentSnapshot;

pub const FALLBACK_MAX_CHARS: usize = 5000;
/// Page text at or below this length is not worth sending to the model.
pub const FALLBACK_MIN_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Teams,
    Zoom,
    Meet,
}

/// A known transcript container: which platform renders it and the selector
/// that finds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptSource {
    pub platform: Platform,
    pub selector: &'static str,
}

impl TranscriptSource {
    pub const fn new(platform: Platform, selector: &'static str) -> Self {
        Self { platform, selector }
    }

    /// Joined text of every match, or `None` when nothing matches.
    pub fn capture(&self, document: &dyn DocumentSnapshot) -> Option<String> {
        let fragments = document.select_text(self.selector);
        if fragments.is_empty() {
            None
        } else {
            Some(fragments.join("\n"))
        }
    }
}

pub const KNOWN_SOURCES: &[TranscriptSource] = &[
    TranscriptSource::new(Platform::Teams, r#"[data-tid="closed-caption-text"]"#),
    TranscriptSource::new(Platform::Teams, ".ui-chat__message__content"),
    TranscriptSource::new(Platform::Zoom, ".transcript-message"),
    TranscriptSource::new(Platform::Zoom, ".meeting-chat-message"),
    TranscriptSource::new(Platform::Meet, ".iOzk7"),
    TranscriptSource::new(Platform::Meet, ".CNusmb"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrigin {
    Source(TranscriptSource),
    Fallback,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub text: String,
    pub origin: CaptureOrigin,
}

#[derive(Debug, Clone)]
pub struct TranscriptExtractor {
    sources: Vec<TranscriptSource>,
}

impl Default for TranscriptExtractor {
    fn default() -> Self {
        Self::with_sources(KNOWN_SOURCES.to_vec())
    }
}

impl TranscriptExtractor {
    /// Sources are tried in the given order; the first one with matches wins.
    pub fn with_sources(sources: Vec<TranscriptSource>) -> Self {
        Self { sources }
    }

    pub fn extract(&self, document: &dyn DocumentSnapshot) -> String {
        self.capture(document).text
    }

    pub fn capture(&self, document: &dyn DocumentSnapshot) -> Capture {
        let matched = self
            .sources
            .iter()
            .find_map(|source| source.capture(document).map(|text| (*source, text)));

        if let Some((source, text)) = matched {
            if !text.is_empty() {
                debug!(
                    platform = ?source.platform,
                    selector = source.selector,
                    "captured transcript from known container"
                );
                return Capture {
                    text,
                    origin: CaptureOrigin::Source(source),
                };
            }
        }

        let page_text = document.visible_text();
        if page_text.chars().count() > FALLBACK_MIN_CHARS {
            debug!("no known container matched, falling back to page text");
            return Capture {
                text: page_text.chars().take(FALLBACK_MAX_CHARS).collect(),
                origin: CaptureOrigin::Fallback,
            };
        }

        Capture {
            text: String::new(),
            origin: CaptureOrigin::Nothing,
        }
    }
}
