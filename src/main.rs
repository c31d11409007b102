use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::{Config, TransportKind};

use roundtable::report;
use roundtable::rpc::{
    HttpTransport, HttpTransportConfig, StdioTransport, StdioTransportConfig, ToolTransport,
};
use roundtable::team::TeamCoordinator;
use roundtable::workflow::WorkflowEngine;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roundtable")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("roundtable.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Build the transport selected by CLI flags, falling back to config.
fn make_transport(cli: &Cli, config: &Config) -> Result<Arc<dyn ToolTransport>> {
    if let Some(url) = &cli.http {
        let mut transport_config = HttpTransportConfig::with_base_url(url);
        transport_config.request_timeout_ms = config.request_timeout_ms;
        return Ok(Arc::new(HttpTransport::new(transport_config)?));
    }

    if let Some(command) = &cli.server {
        let argv: Vec<String> = command.split_whitespace().map(String::from).collect();
        if argv.is_empty() {
            eyre::bail!("--server command is empty");
        }
        return Ok(Arc::new(StdioTransport::new(StdioTransportConfig {
            command: argv,
            request_timeout_ms: config.request_timeout_ms,
        })));
    }

    match config.transport {
        TransportKind::Http => {
            let mut transport_config = HttpTransportConfig::with_base_url(&config.http.base_url);
            transport_config.request_timeout_ms = config.request_timeout_ms;
            Ok(Arc::new(HttpTransport::new(transport_config)?))
        }
        TransportKind::Stdio => Ok(Arc::new(StdioTransport::new(StdioTransportConfig {
            command: config.server.command.clone(),
            request_timeout_ms: config.request_timeout_ms,
        }))),
    }
}

fn read_source(file: &Path) -> Result<String> {
    fs::read_to_string(file)
        .with_context(|| format!("Failed to read input file: {}", file.display()))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let transport = make_transport(cli, config)?;

    match &cli.command {
        Commands::Review { file, language } => handle_review(transport, file, language).await,
        Commands::Generate {
            requirements,
            practitioner,
            code_type,
            language,
        } => handle_generate(transport, requirements, practitioner, code_type, language).await,
        Commands::Plan {
            description,
            team_size,
        } => handle_plan(transport, description, *team_size).await,
        Commands::Improve {
            file,
            language,
            target_score,
        } => handle_improve(transport, file, language, *target_score).await,
        Commands::Consensus { question } => handle_consensus(transport, question).await,
        Commands::Design { requirements } => handle_design(transport, requirements).await,
        Commands::Tools => handle_tools(transport).await,
        Commands::Ping => handle_ping(transport).await,
    }
}

async fn handle_review(
    transport: Arc<dyn ToolTransport>,
    file: &Path,
    language: &str,
) -> Result<()> {
    info!("Reviewing {} as {}", file.display(), language);
    let code = read_source(file)?;

    let coordinator = TeamCoordinator::new(transport);
    let review = coordinator.coordinate_code_review(&code, language).await;

    print!("{}", report::render_review(&review));
    Ok(())
}

async fn handle_generate(
    transport: Arc<dyn ToolTransport>,
    requirements: &str,
    practitioner: &str,
    code_type: &str,
    language: &str,
) -> Result<()> {
    info!("Generating {} in {}'s style", code_type, practitioner);

    let coordinator = TeamCoordinator::new(transport);
    let agent = coordinator
        .agents()
        .iter()
        .find(|a| a.style.style_id == practitioner)
        .ok_or_else(|| eyre::eyre!("Unknown practitioner: {}", practitioner))?;

    let result = agent.generate_code(code_type, requirements, language).await?;

    println!("{} {}", "Generated by:".green(), agent.style.name);
    match result.get("generatedCode").and_then(Value::as_str) {
        Some(code) => println!("{}", code),
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

async fn handle_plan(
    transport: Arc<dyn ToolTransport>,
    description: &str,
    team_size: usize,
) -> Result<()> {
    info!("Planning feature: {} (team of {})", description, team_size);

    let coordinator = TeamCoordinator::new(transport);
    let plan = coordinator.plan_feature_development(description, team_size).await;

    print!("{}", report::render_plan(&plan));
    Ok(())
}

async fn handle_improve(
    transport: Arc<dyn ToolTransport>,
    file: &Path,
    language: &str,
    target_score: f64,
) -> Result<()> {
    info!("Improving {} toward score {}", file.display(), target_score);
    let code = read_source(file)?;

    let engine = WorkflowEngine::new(transport);
    let result = engine.sequential_improvement(&code, language, target_score).await?;

    print!("{}", report::render_workflow(&result));
    Ok(())
}

async fn handle_consensus(transport: Arc<dyn ToolTransport>, question: &str) -> Result<()> {
    info!("Building consensus on: {}", question);

    let engine = WorkflowEngine::new(transport);
    let result = engine.consensus_building(question).await?;

    print!("{}", report::render_workflow(&result));
    Ok(())
}

async fn handle_design(transport: Arc<dyn ToolTransport>, requirements: &str) -> Result<()> {
    info!("Collaborative design for: {}", requirements);

    let engine = WorkflowEngine::new(transport);
    let result = engine.collaborative_design(requirements).await?;

    print!("{}", report::render_workflow(&result));
    Ok(())
}

async fn handle_tools(transport: Arc<dyn ToolTransport>) -> Result<()> {
    let tools = transport.list_tools().await.context("Failed to list tools")?;
    print!("{}", report::render_tools(&tools));
    Ok(())
}

async fn handle_ping(transport: Arc<dyn ToolTransport>) -> Result<()> {
    transport.probe().await.context("Tool server unreachable")?;
    println!("{}", "Tool server reachable".green());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
