use async_trait::async_trait;
use tokio::process::Command;

use crate::platform;

/// Captured result of one spawned process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn failure(message: impl Into<String>) -> Self {
        CommandOutput {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
            exit_code: None,
        }
    }

    /// Stdout and stderr joined, trimmed. Version banners land on either
    /// stream depending on the tool.
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        text.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stderr.is_empty() {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text.trim().to_string()
    }

    /// Last non-empty line of the combined output, used as a one-line
    /// summary of a finished command.
    pub fn summary_line(&self) -> Option<String> {
        self.combined()
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
    }
}

/// Seam over process spawning so resolvers and the updater can be exercised
/// with scripted outputs in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> CommandOutput;
}

/// Spawns the program directly with an argument vector. Arguments are never
/// interpolated into a shell string, so tool and package names cannot
/// smuggle shell syntax.
pub struct SystemRunner {
    path: String,
}

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner {
            path: platform::enhanced_path(),
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> CommandOutput {
        tracing::debug!(program, ?args, "spawning");

        let output = Command::new(program)
            .args(args)
            .env("PATH", &self.path)
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) => CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                exit_code: output.status.code(),
            },
            Err(e) => {
                tracing::debug!(program, error = %e, "spawn failed");
                CommandOutput::failure(e.to_string())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_joins_both_streams() {
        let output = CommandOutput {
            success: true,
            stdout: "1.2.3\n".to_string(),
            stderr: "warning: deprecated\n".to_string(),
            exit_code: Some(0),
        };
        assert_eq!(output.combined(), "1.2.3\nwarning: deprecated");
    }

    #[test]
    fn summary_line_skips_trailing_blanks() {
        let output = CommandOutput {
            success: true,
            stdout: "updated 1 package\n\n".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        };
        assert_eq!(output.summary_line().as_deref(), Some("updated 1 package"));
    }

    #[tokio::test]
    async fn system_runner_reports_missing_program_as_failure() {
        let runner = SystemRunner::new();
        let output = runner.run("definitely-not-a-real-binary-aiup", &[]).await;
        assert!(!output.success);
        assert!(output.exit_code.is_none());
    }
}
