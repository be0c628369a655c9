// Elicit - requirements elicitation through simulated user interviews
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use elicit::config::load_config;
use elicit::elicitation::{Workflow, WorkflowState};
use elicit::generation::ProviderService;
use elicit::providers::{create_provider_from_entry, LlmProvider};

#[derive(Parser)]
#[command(name = "elicit")]
#[command(version)]
#[command(
    about = "Turn a one-line request into a requirements document by interviewing synthetic personas",
    long_about = None
)]
struct Cli {
    /// What the user wants built, e.g. "build a fitness app"
    request: String,

    /// Config file (default: ~/.elicit/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Personas generated per cycle
    #[arg(short = 'k', long = "personas")]
    personas: Option<usize>,

    /// Maximum generate → interview → evaluate cycles
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Language the requirements document is written in
    #[arg(long)]
    language: Option<String>,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export the final workflow state (personas, interviews, verdict) as JSON
    #[arg(long)]
    state_json: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(k) = cli.personas {
        config.run.persona_count = k;
    }
    if let Some(n) = cli.max_iterations {
        config.run.max_iterations = n;
    }
    if cli.language.is_some() {
        config.run.language = cli.language.clone();
    }
    config.validate()?;

    let provider: Arc<dyn LlmProvider> = Arc::from(create_provider_from_entry(&config.provider)?);
    tracing::info!(
        provider = provider.name(),
        model = config.provider.model().unwrap_or(provider.default_model()),
        "Using provider"
    );

    let service = Arc::new(ProviderService::from_settings(provider, &config.run));
    let workflow = Workflow::new(service, config.run.workflow_config());

    let state = match workflow.run_to_state(&cli.request).await {
        Ok(state) => state,
        Err(err) => {
            // Partial state is still useful for diagnosing the failure
            if let Some(path) = &cli.state_json {
                write_state(path, err.state())?;
            }
            return Err(err).context("Requirements elicitation failed");
        }
    };

    if let Some(path) = &cli.state_json {
        write_state(path, &state)?;
    }

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &state.requirements_doc)
                .with_context(|| format!("Failed to write document to {}", path.display()))?;
            eprintln!(
                "✓ Requirements document written to {} ({} personas, {} interviews, {} iterations)",
                path.display(),
                state.personas.len(),
                state.interviews.len(),
                state.iteration
            );
        }
        None => println!("{}", state.requirements_doc),
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the document
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("elicit=debug,warn")
        } else {
            EnvFilter::new("elicit=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn write_state(path: &Path, state: &WorkflowState) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to serialize workflow state")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write workflow state to {}", path.display()))
}
