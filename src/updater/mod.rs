use futures::future::join_all;
use thiserror::Error;

use crate::notify::Reporter;
use crate::runner::CommandRunner;
use crate::settings::Settings;
use crate::state::{StatusBoard, VersionStatus};
use crate::tools::{ToolDescriptor, UpdateMechanism};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("update command failed: {message}")]
    CommandFailed { message: String },
}

/// Result of one tool's update. Failures are carried as values so a bulk
/// run can tally them instead of aborting.
#[derive(Debug)]
pub struct UpdateOutcome {
    pub tool_id: &'static str,
    pub result: Result<String, UpdateError>,
}

impl UpdateOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run a single tool's update and report the outcome. Native tools run
/// their own update subcommand; everything else is reinstalled globally
/// through the preferred package manager. No retries.
pub async fn update_one(
    tool: &'static ToolDescriptor,
    runner: &dyn CommandRunner,
    settings: &Settings,
    reporter: &dyn Reporter,
) -> UpdateOutcome {
    reporter.started(&format!("Updating {}...", tool.title));

    let output = match tool.update {
        UpdateMechanism::Native { args } => runner.run(tool.command, args).await,
        UpdateMechanism::GlobalInstall => {
            let argv = settings.package_manager.global_install_args(tool.package);
            let args: Vec<&str> = argv[1..].iter().map(String::as_str).collect();
            runner.run(&argv[0], &args).await
        }
    };

    if output.success {
        let summary = output
            .summary_line()
            .unwrap_or_else(|| "update finished".to_string());
        reporter.success(&format!("{}: {}", tool.title, summary));
        UpdateOutcome {
            tool_id: tool.id,
            result: Ok(summary),
        }
    } else {
        let message = if output.stderr.trim().is_empty() {
            output.combined()
        } else {
            output.stderr.trim().to_string()
        };
        tracing::warn!(tool = tool.id, %message, "update failed");
        reporter.failure(&format!("{} update failed: {}", tool.title, message));
        UpdateOutcome {
            tool_id: tool.id,
            result: Err(UpdateError::CommandFailed { message }),
        }
    }
}

/// Update every tool whose recorded status is outdated. Updates run
/// concurrently and independently; one tool failing never cancels the
/// rest. Returns one outcome per attempted tool.
pub async fn update_all(
    tools: &[&'static ToolDescriptor],
    board: &StatusBoard,
    runner: &dyn CommandRunner,
    settings: &Settings,
    reporter: &dyn Reporter,
) -> Vec<UpdateOutcome> {
    let outdated: Vec<_> = tools
        .iter()
        .copied()
        .filter(|t| board.status(t.id) == VersionStatus::Outdated)
        .collect();

    if outdated.is_empty() {
        reporter.success("All tools already up to date.");
        return Vec::new();
    }

    reporter.started(&format!("Updating {} outdated tool(s)...", outdated.len()));

    let outcomes = join_all(
        outdated
            .iter()
            .map(|tool| update_one(tool, runner, settings, reporter)),
    )
    .await;

    let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
    let failed = outcomes.len() - succeeded;

    if failed == 0 {
        reporter.success(&format!("Updated {succeeded} tool(s)."));
    } else {
        reporter.failure(&format!("{succeeded} updated, {failed} failed."));
    }

    outcomes
}
