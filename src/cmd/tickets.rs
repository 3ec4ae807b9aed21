use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde_json::json;
use tokio::io::AsyncReadExt;

use crate::cache::{StoredBatch, TicketBatchStore};
use crate::capture::html::HtmlSnapshot;
use crate::context::AppContext;
use crate::domain::credentials::ModelCredentials;
use crate::domain::report::PublishReport;
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::workflow::Pipeline;

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Saved meeting page (HTML) to capture the transcript from.
    #[arg(long, value_name = "HTML")]
    pub page: Option<PathBuf>,
    /// Plain-text transcript file, or '-' to read stdin.
    #[arg(long, value_name = "FILE")]
    pub transcript: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Print machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Print machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run_analyze(ctx: &AppContext, args: AnalyzeArgs) -> AppResult<()> {
    let credentials = ctx.config.model_credentials()?;
    let mut pipeline = Pipeline::from_context(ctx);

    let tickets = analyze_input(&mut pipeline, &args.input, &credentials).await?;
    let batch = StoredBatch::new(tickets);
    TicketBatchStore::open()?.save(&batch)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        print_batch(&batch);
        println!("\nRun `storyscribe publish` to create these issues.");
    }
    Ok(())
}

pub async fn run_publish(ctx: &AppContext, args: PublishArgs) -> AppResult<()> {
    let credentials = ctx.config.tracker_credentials()?;
    let batch = TicketBatchStore::open()?.load()?.ok_or_else(|| {
        AppError::EmptyInput("no analyzed tickets; run `storyscribe analyze` first".to_string())
    })?;

    let pipeline = Pipeline::from_context(ctx);
    let report = pipeline.publish_all(&batch.tickets, &credentials).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Publishing batch {} to {}", batch.short_id(), credentials.repository);
        print_report(&report);
    }
    Ok(())
}

/// Analyze and publish in one go, straight from the pipeline's cached batch.
pub async fn run_all(ctx: &AppContext, args: AnalyzeArgs) -> AppResult<()> {
    let model_credentials = ctx.config.model_credentials()?;
    let tracker_credentials = ctx.config.tracker_credentials()?;
    let mut pipeline = Pipeline::from_context(ctx);

    let tickets = analyze_input(&mut pipeline, &args.input, &model_credentials).await?;
    let batch = StoredBatch::new(tickets);
    TicketBatchStore::open()?.save(&batch)?;
    if !args.json {
        print_batch(&batch);
        println!();
    }

    let report = pipeline.publish_last(&tracker_credentials).await?;

    if args.json {
        let output = json!({ "batch": batch, "report": report });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

async fn analyze_input(
    pipeline: &mut Pipeline,
    input: &InputArgs,
    credentials: &ModelCredentials,
) -> AppResult<Vec<Ticket>> {
    if let Some(page) = &input.page {
        let snapshot = HtmlSnapshot::load(page)?;
        return pipeline.analyze(&snapshot, credentials).await;
    }

    let transcript = read_transcript(input.transcript.as_deref()).await?;
    pipeline.analyze_transcript(&transcript, credentials).await
}

async fn read_transcript(path: Option<&Path>) -> AppResult<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut transcript = String::new();
            tokio::io::stdin().read_to_string(&mut transcript).await?;
            Ok(transcript)
        }
    }
}

fn print_batch(batch: &StoredBatch) {
    if batch.tickets.is_empty() {
        println!("No actionable tickets found.");
        return;
    }

    println!(
        "Found {} tickets (batch {}):",
        batch.tickets.len(),
        batch.short_id()
    );
    for (position, ticket) in batch.tickets.iter().enumerate() {
        println!("{:>3}. [{}] {}", position + 1, ticket.kind, ticket.title);
        for line in ticket.description.lines() {
            println!("       {line}");
        }
    }
}

fn print_report(report: &PublishReport) {
    for outcome in &report.outcomes {
        let ticket = &outcome.ticket;
        let url = outcome.issue.as_ref().and_then(|issue| issue.url.as_deref());
        match (&outcome.failure, url) {
            (Some(reason), _) => println!("  FAILED [{}] {}: {reason}", ticket.kind, ticket.title),
            (None, Some(url)) => println!("  ok     [{}] {} -> {url}", ticket.kind, ticket.title),
            (None, None) => println!("  ok     [{}] {}", ticket.kind, ticket.title),
        }
    }
    println!(
        "Created {}/{} issues ({} failed).",
        report.succeeded,
        report.attempted,
        report.failed()
    );
}
