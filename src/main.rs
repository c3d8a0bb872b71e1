use anyhow::Result;
use clap::Parser;
use console::style;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;
mod notify;
mod platform;
mod resolver;
mod runner;
mod settings;
mod state;
mod tools;
mod updater;

use cli::{Cli, Commands};
use notify::ConsoleReporter;
use resolver::installed::resolve_installed;
use resolver::latest::LatestResolver;
use runner::{CommandRunner, SystemRunner};
use settings::Settings;
use state::{StatusBoard, VersionStatus};
use tools::ToolDescriptor;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("aiup=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::List => cmd_list().await,
        Commands::Check { tool } => cmd_check(tool).await,
        Commands::Update { tool, all } => cmd_update(tool, all).await,
        Commands::Config {
            default_tool,
            package_manager,
            raw_version_fallback,
        } => cmd_config(default_tool, package_manager, raw_version_fallback),
    }
}

/// Resolve installed and latest versions for one tool. The two sides are
/// independent and awaited together; either may come back empty.
async fn refresh_tool(
    tool: &'static ToolDescriptor,
    runner: &dyn CommandRunner,
    resolver: &LatestResolver,
    settings: &Settings,
) -> (Option<String>, Option<String>) {
    tokio::join!(
        resolve_installed(tool, runner, settings.raw_version_fallback),
        resolver.resolve(tool.package, settings.package_manager, runner),
    )
}

/// Refresh every supported tool concurrently and record the results.
async fn refresh_all(
    runner: &dyn CommandRunner,
    resolver: &LatestResolver,
    settings: &Settings,
) -> StatusBoard {
    let results = join_all(
        tools::all_tools()
            .iter()
            .map(|tool| async move { (tool.id, refresh_tool(tool, runner, resolver, settings).await) }),
    )
    .await;

    let mut board = StatusBoard::new();
    for (id, (installed, latest)) in results {
        board.record(id, installed, latest);
    }
    board
}

fn checking_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn styled_status(status: VersionStatus) -> console::StyledObject<&'static str> {
    match status {
        VersionStatus::UpToDate => style(status.label()).green(),
        VersionStatus::Outdated => style(status.label()).yellow(),
        VersionStatus::Unknown => style(status.label()).dim(),
    }
}

async fn cmd_list() -> Result<()> {
    let settings = Settings::load(&Settings::default_path());
    let runner = SystemRunner::new();
    let resolver = LatestResolver::new();

    let pb = checking_spinner("Checking tools...");
    let board = refresh_all(&runner, &resolver, &settings).await;
    pb.finish_and_clear();

    println!("{} Supported tools:\n", style("→").cyan().bold());

    for tool in tools::all_tools() {
        let tool_state = board.get(tool.id);
        let installed = tool_state
            .installed
            .clone()
            .unwrap_or_else(|| "not detected".to_string());

        println!(
            "  {} - {} {} [{}]",
            tool.id,
            tool.title,
            style(installed).cyan(),
            styled_status(tool_state.status())
        );
    }

    Ok(())
}

async fn cmd_check(tool_id: Option<String>) -> Result<()> {
    let settings = Settings::load(&Settings::default_path());
    let tool_id = tool_id.unwrap_or_else(|| settings.default_tool.clone());
    let tool = tools::get_tool(&tool_id)?;

    let runner = SystemRunner::new();
    let resolver = LatestResolver::new();

    let pb = checking_spinner(&format!("Checking {}...", tool.title));
    let (installed, latest) = refresh_tool(tool, &runner, &resolver, &settings).await;
    pb.finish_and_clear();

    let status = VersionStatus::derive(installed.as_deref(), latest.as_deref());

    println!("{} {}\n", style("→").cyan().bold(), tool.title);
    println!(
        "  installed: {}",
        style(installed.as_deref().unwrap_or("not detected")).cyan()
    );
    println!(
        "  latest:    {}",
        style(latest.as_deref().unwrap_or("unavailable")).cyan()
    );
    println!("  status:    {}", styled_status(status));

    Ok(())
}

async fn cmd_update(tool_id: Option<String>, all: bool) -> Result<()> {
    let settings = Settings::load(&Settings::default_path());
    let runner = SystemRunner::new();
    let resolver = LatestResolver::new();
    let reporter = ConsoleReporter;

    if all {
        let pb = checking_spinner("Checking tools...");
        let board = refresh_all(&runner, &resolver, &settings).await;
        pb.finish_and_clear();

        let tool_refs: Vec<_> = tools::all_tools().iter().collect();
        let outcomes =
            updater::update_all(&tool_refs, &board, &runner, &settings, &reporter).await;

        if outcomes.iter().any(|o| !o.succeeded()) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let tool_id = tool_id.unwrap_or_else(|| settings.default_tool.clone());
    let tool = tools::get_tool(&tool_id)?;

    let outcome = updater::update_one(tool, &runner, &settings, &reporter).await;

    // Re-resolve both sides so the reported status reflects the update.
    let pb = checking_spinner(&format!("Re-checking {}...", tool.title));
    let (installed, latest) = refresh_tool(tool, &runner, &resolver, &settings).await;
    pb.finish_and_clear();

    let status = VersionStatus::derive(installed.as_deref(), latest.as_deref());
    println!(
        "  {} is now {} [{}]",
        tool.title,
        style(installed.as_deref().unwrap_or("not detected")).cyan(),
        styled_status(status)
    );

    if !outcome.succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_config(
    default_tool: Option<String>,
    package_manager: Option<settings::PackageManager>,
    raw_version_fallback: Option<bool>,
) -> Result<()> {
    let path = Settings::default_path();
    let mut current = Settings::load(&path);

    let changed =
        default_tool.is_some() || package_manager.is_some() || raw_version_fallback.is_some();

    if let Some(tool_id) = default_tool {
        // Reject ids that no descriptor carries before persisting them.
        tools::get_tool(&tool_id)?;
        current.default_tool = tool_id;
    }
    if let Some(pm) = package_manager {
        current.package_manager = pm;
    }
    if let Some(raw) = raw_version_fallback {
        current.raw_version_fallback = raw;
    }

    if changed {
        current.save(&path)?;
        println!("{} Settings saved.\n", style("✓").green().bold());
    }

    println!("{} Current settings:\n", style("→").cyan().bold());
    println!("  default tool:         {}", style(&current.default_tool).cyan());
    println!(
        "  package manager:      {}",
        style(current.package_manager.name()).cyan()
    );
    println!(
        "  raw version fallback: {}",
        style(current.raw_version_fallback).cyan()
    );

    Ok(())
}
