use crate::runner::CommandRunner;
use crate::tools::ToolDescriptor;

use super::extract_version;

/// Flags probed in order; cheaper and more widely supported flags first.
const PROBE_FLAGS: &[&str] = &["-v", "--version", "version"];

/// Determine the installed version of a tool by probing its binary with
/// each flag in turn, strictly sequentially, stopping at the first probe
/// that yields usable text. Probe failures are silent; `None` means every
/// probe was exhausted and maps downstream to an unknown status.
///
/// When no semver pattern is found in a probe's output and `raw_fallback`
/// is on, the raw trimmed text is accepted as a best-effort version. That
/// can surface help text as a "version"; the toggle exists so users bitten
/// by it can turn it off.
pub async fn resolve_installed(
    tool: &ToolDescriptor,
    runner: &dyn CommandRunner,
    raw_fallback: bool,
) -> Option<String> {
    for flag in PROBE_FLAGS {
        let output = runner.run(tool.command, &[flag]).await;

        if !output.success {
            tracing::debug!(tool = tool.id, flag, "version probe failed");
            continue;
        }

        let text = output.combined();
        if text.is_empty() {
            continue;
        }

        if let Some(version) = extract_version(&text) {
            return Some(version);
        }

        if raw_fallback {
            tracing::debug!(tool = tool.id, flag, "no semver in output, using raw text");
            return Some(text);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{failed_output, ok_output, ScriptedRunner};
    use crate::tools::get_tool;

    #[tokio::test]
    async fn first_successful_probe_stops_the_chain() {
        let runner = ScriptedRunner::from_stdout(&["1.0.17"]);
        let tool = get_tool("claude-code").unwrap();

        let version = resolve_installed(tool, &runner, true).await;

        assert_eq!(version.as_deref(), Some("1.0.17"));
        assert_eq!(runner.call_count(), 1);
        assert_eq!(runner.calls()[0], ("claude".to_string(), vec!["-v".to_string()]));
    }

    #[tokio::test]
    async fn later_probe_recovers_after_silent_failures() {
        let runner = ScriptedRunner::from_stdout(&["", "", "2.3.1 (build info)"]);
        let tool = get_tool("claude-code").unwrap();

        let version = resolve_installed(tool, &runner, true).await;

        assert_eq!(version.as_deref(), Some("2.3.1"));
        assert_eq!(runner.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_probes_return_none() {
        let runner = ScriptedRunner::new(vec![
            failed_output("command not found"),
            failed_output("command not found"),
            failed_output("command not found"),
        ]);
        let tool = get_tool("codex").unwrap();

        assert_eq!(resolve_installed(tool, &runner, true).await, None);
        assert_eq!(runner.call_count(), 3);
    }

    #[tokio::test]
    async fn version_is_picked_up_from_stderr() {
        let mut output = ok_output("");
        output.stderr = "gemini version 0.4.1\n".to_string();
        let runner = ScriptedRunner::new(vec![output]);
        let tool = get_tool("gemini-cli").unwrap();

        assert_eq!(
            resolve_installed(tool, &runner, true).await.as_deref(),
            Some("0.4.1")
        );
    }

    #[tokio::test]
    async fn raw_fallback_accepts_unparseable_text() {
        let runner = ScriptedRunner::from_stdout(&["development build"]);
        let tool = get_tool("opencode").unwrap();

        assert_eq!(
            resolve_installed(tool, &runner, true).await.as_deref(),
            Some("development build")
        );
    }

    #[tokio::test]
    async fn raw_fallback_off_keeps_probing() {
        let runner =
            ScriptedRunner::from_stdout(&["usage: opencode", "usage: opencode", "3.1.4"]);
        let tool = get_tool("opencode").unwrap();

        assert_eq!(
            resolve_installed(tool, &runner, false).await.as_deref(),
            Some("3.1.4")
        );
        assert_eq!(runner.call_count(), 3);
    }
}
