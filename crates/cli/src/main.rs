//! `sheetflow`: command-line front-end for the spreadsheet ingestion backend.

mod output;
mod prompt;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use sheetflow_client::{ClientConfig, HttpTransport};
use sheetflow_core::notice::Notice;
use sheetflow_core::types::FileId;
use sheetflow_workflow::render::apply_series;
use sheetflow_workflow::{AssumeYes, IngestionWorkflow, WorkflowConfig};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::TextBarChart;
use crate::prompt::StdinConfirm;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str =
    "sheetflow=info,sheetflow_workflow=info,sheetflow_client=info,sheetflow_events=info";

#[derive(Parser, Debug)]
#[command(author, version, about = "Spreadsheet ingestion client", long_about = None)]
struct Cli {
    /// Backend base URL (overrides `SHEETFLOW_API_URL`)
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List uploaded files with their lifecycle status
    List,
    /// Upload an .xls/.xlsx file
    Upload {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Show the per-sheet preview of an uploaded file
    Preview { id: FileId },
    /// Insert a file's rows into the backend store
    Insert { id: FileId },
    /// Delete an uploaded file
    Delete {
        id: FileId,
        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Draw the product statistics chart
    Chart,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut client_config = ClientConfig::from_env().context("invalid client configuration")?;
    if let Some(url) = cli.api_url {
        client_config = client_config
            .with_base_url(url)
            .context("invalid --api-url")?;
    }
    let workflow_config = WorkflowConfig::from_env().context("invalid workflow configuration")?;

    let transport = Arc::new(HttpTransport::from_config(&client_config)?);
    tracing::debug!(base_url = transport.base_url(), "Backend transport ready");

    let workflow = IngestionWorkflow::new(transport, workflow_config);
    let workflow = match &cli.command {
        Command::Delete { yes: true, .. } => workflow.with_confirm(AssumeYes),
        Command::Delete { .. } => workflow.with_confirm(StdinConfirm),
        _ => workflow,
    };

    let mut notices = workflow.notices().subscribe();
    let result = run(&workflow, cli.command).await;
    print_notices(&mut notices);
    result
}

async fn run(workflow: &IngestionWorkflow, command: Command) -> Result<()> {
    match command {
        Command::List => {
            workflow.init().await;
            let entries = workflow.catalog().entries().await;
            output::print_catalog(&mut io::stdout(), &entries)?;
        }
        Command::Upload { path } => {
            let contents = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            workflow.select_file(file_name(&path)?, contents)?;

            let reporter = spawn_progress_reporter(workflow.subscribe_progress());
            let outcome = workflow.upload_file().await;
            reporter.abort();

            let receipt = outcome?;
            if let Some(id) = receipt.file_id {
                println!("Uploaded as file {id}");
            }
        }
        Command::Preview { id } => {
            let outcome = workflow.show_preview(id).await?;
            output::print_preview(&mut io::stdout(), &outcome.sheets)?;
        }
        Command::Insert { id } => {
            let reporter = spawn_progress_reporter(workflow.subscribe_progress());
            let outcome = workflow.insert_data(id).await;
            reporter.abort();
            outcome?;

            let mut renderer = TextBarChart::new(io::stdout());
            apply_series(&mut renderer, &workflow.chart().current());
        }
        Command::Delete { id, .. } => {
            workflow.delete_file(id).await?;
            println!("Deleted file {id}");
        }
        Command::Chart => {
            let series = workflow
                .refresh_chart()
                .await
                .ok_or_else(|| anyhow!("could not load chart data"))?;
            let mut renderer = TextBarChart::new(io::stdout());
            apply_series(&mut renderer, &series);
        }
    }
    Ok(())
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))
}

/// Echo progress changes to stderr until aborted.
fn spawn_progress_reporter(mut progress: watch::Receiver<u8>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let percent = *progress.borrow_and_update();
            eprint!("\rProgress: {percent:>3}%");
            if percent == 100 {
                eprintln!();
            }
        }
    })
}

fn print_notices(notices: &mut broadcast::Receiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        println!("{}", output::format_notice(&notice));
    }
}
