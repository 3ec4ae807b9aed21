use std::path::PathBuf;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::capture::buffer::CaptionBuffer;
use crate::capture::html::HtmlSnapshot;
use crate::capture::{CaptureOrigin, TranscriptExtractor};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct CaptureArgs {
    /// Saved meeting page (HTML).
    #[arg(long, value_name = "HTML")]
    pub page: PathBuf,
}

pub fn run_capture(args: CaptureArgs) -> AppResult<()> {
    let snapshot = HtmlSnapshot::load(&args.page)?;
    let capture = TranscriptExtractor::default().capture(&snapshot);

    match capture.origin {
        CaptureOrigin::Source(source) => {
            info!(platform = ?source.platform, selector = source.selector, "transcript captured")
        }
        CaptureOrigin::Fallback => {
            warn!("no known transcript container on the page, using page text")
        }
        CaptureOrigin::Nothing => {
            return Err(AppError::EmptyInput("no transcript found on page".to_string()));
        }
    }

    println!("{}", capture.text);
    Ok(())
}

/// Buffers caption fragments from stdin, one per line, until EOF.
pub async fn run_listen() -> AppResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer = CaptionBuffer::new();

    while let Some(line) = lines.next_line().await? {
        if !buffer.push(&line) {
            debug!(chars = line.chars().count(), "skipped fragment");
        }
    }

    if buffer.is_empty() {
        return Err(AppError::EmptyInput(
            "no caption fragments captured".to_string(),
        ));
    }

    info!(fragments = buffer.len(), "captions buffered");
    println!("{}", buffer.transcript());
    Ok(())
}
