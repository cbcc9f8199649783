use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use staffing_workflow::config::AppConfig;
use staffing_workflow::intake::IntakeMapper;
use staffing_workflow::logging::{init_logging, OperationTimer};
use staffing_workflow::{Clock, ExecutionPhase, ProjectPhase, SystemClock, WorkflowStore};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a demo project through the workflow and print the final state
    Demo {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Map an intake service payload and load it into a store
    Intake {
        /// JSON payload file
        #[arg(short, long)]
        file: PathBuf,

        /// Shortlist the staffing plan on the new project
        #[arg(long)]
        assign: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Print the effective configuration
    ShowConfig {
        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    let _guard = init_logging(&config.logging)?;

    info!("Starting staffing-workflow");

    match cli.command {
        Commands::Demo { format } => run_demo(&config, format).await?,
        Commands::Intake { file, assign, format } => run_intake(&config, &file, assign, format).await?,
        Commands::ShowConfig { format } => print(&config, format)?,
    }

    Ok(())
}

/// Build a store from configuration, logging its events in the background
fn open_store(config: &AppConfig) -> (WorkflowStore, tokio::task::JoinHandle<()>) {
    let settings = config.store_settings();
    let store = if config.store.seed_demo_data {
        WorkflowStore::with_demo_data(settings, Box::new(SystemClock))
    } else {
        WorkflowStore::new(settings)
    };

    let mut events = store.subscribe();
    let listener = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(?event, "Store event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Store event listener lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });
    (store, listener)
}

async fn run_demo(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let timer = OperationTimer::new("demo");
    let mut config = config.clone();
    config.store.seed_demo_data = true;
    let (mut store, listener) = open_store(&config);

    let project = "proj1";
    store.assign_consultants_to_project(project, &["cons1", "cons2"])?;
    store.add_project_note(project, "Both candidates cleared the technical screen.")?;
    store.toggle_consultant_selection(project, "cons2")?;
    store.advance_project_phase(project, ProjectPhase::ProfileDelivery, None)?;

    let invitations = store.send_meeting_invitations(project, &["cons1"])?;
    for message_id in &invitations {
        store.accept_meeting_invitation(message_id)?;
    }

    store.advance_project_phase(project, ProjectPhase::ClientInterviews, None)?;
    store.advance_project_phase(project, ProjectPhase::InProgress, None)?;
    store.advance_project_phase(project, ProjectPhase::InProgress, Some(ExecutionPhase::SchemaDesign))?;

    let summary = store.summary();
    info!(
        unread = summary.unread_messages,
        utilization = summary.utilization,
        "Demo workflow finished"
    );

    #[derive(Serialize)]
    struct DemoOutput<'a> {
        state: &'a staffing_workflow::StoreState,
        summary: staffing_workflow::DashboardSummary,
    }
    print(
        &DemoOutput {
            state: store.snapshot(),
            summary,
        },
        format,
    )?;

    drop(store);
    listener.await.context("Event listener failed")?;
    timer.finish();
    Ok(())
}

async fn run_intake(config: &AppConfig, file: &Path, assign: bool, format: OutputFormat) -> Result<()> {
    let timer = OperationTimer::new("intake");
    let payload = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let mapper = IntakeMapper::new(config.intake.clone())?;
    let draft = mapper.parse(&payload, SystemClock.now().date_naive())?;
    let plan = draft.staffing_plan();

    let (mut store, listener) = open_store(config);
    let outcome = draft.clone().apply(&mut store)?;
    if assign && !plan.is_empty() {
        store.assign_consultants_to_project(&outcome.project_id, &plan)?;
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct IntakeOutput<'a> {
        draft: staffing_workflow::intake::IntakeDraft,
        staffing_plan: Vec<String>,
        project: Option<&'a staffing_workflow::Project>,
    }
    print(
        &IntakeOutput {
            draft,
            staffing_plan: plan,
            project: store.project(&outcome.project_id),
        },
        format,
    )?;

    drop(store);
    listener.await.context("Event listener failed")?;
    timer.finish();
    Ok(())
}

fn print<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("Failed to render JSON")?,
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to render YAML")?,
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("Failed to write output")?;
    Ok(())
}
