use serde::Deserialize;

use crate::runner::CommandRunner;
use crate::settings::PackageManager;

/// Default base URL for the npm registry.
const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    version: String,
}

#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(rename = "dist-tags")]
    dist_tags: DistTags,
}

#[derive(Debug, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

/// Resolves the published version of a package through a layered strategy
/// list: package-manager view probes first, then the registry's `/latest`
/// metadata endpoint, then the full package document as a last resort.
/// Different environments block different layers (no node tooling, locked
/// down registry proxies); the order maximizes the chance one works.
pub struct LatestResolver {
    client: reqwest::Client,
    registry_base: String,
}

impl LatestResolver {
    pub fn new() -> Self {
        Self::with_registry(DEFAULT_REGISTRY)
    }

    pub fn with_registry(base_url: &str) -> Self {
        LatestResolver {
            client: reqwest::Client::builder()
                .user_agent(concat!("aiup/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            registry_base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the latest published version, or `None` when every strategy
    /// failed. Never errors; each stage's failure is logged and the next
    /// stage is tried.
    pub async fn resolve(
        &self,
        package: &str,
        manager: PackageManager,
        runner: &dyn CommandRunner,
    ) -> Option<String> {
        if let Some(version) = self.from_view_probes(package, manager, runner).await {
            return Some(version);
        }

        if let Some(version) = self.from_latest_endpoint(package).await {
            return Some(version);
        }

        self.from_package_document(package).await
    }

    async fn from_view_probes(
        &self,
        package: &str,
        manager: PackageManager,
        runner: &dyn CommandRunner,
    ) -> Option<String> {
        for argv in manager.view_candidates(package) {
            let (program, args) = argv.split_first()?;
            let args: Vec<&str> = args.iter().map(String::as_str).collect();

            let output = runner.run(program, &args).await;
            if !output.success {
                tracing::debug!(package, program, "view probe failed");
                continue;
            }

            let text = output.combined();
            if text.is_empty() {
                continue;
            }

            if let Some(version) = parse_view_output(&text) {
                return Some(version);
            }
        }

        None
    }

    async fn from_latest_endpoint(&self, package: &str) -> Option<String> {
        let url = format!(
            "{}/{}/latest",
            self.registry_base,
            encode_package_name(package)
        );

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(package, error = %e, "latest endpoint unreachable");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(package, status = %response.status(), "latest endpoint refused");
            return None;
        }

        match response.json::<LatestResponse>().await {
            Ok(body) if !body.version.trim().is_empty() => Some(body.version.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(package, error = %e, "latest endpoint body unreadable");
                None
            }
        }
    }

    async fn from_package_document(&self, package: &str) -> Option<String> {
        let url = format!("{}/{}", self.registry_base, encode_package_name(package));

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(package, error = %e, "package document unreachable");
                return None;
            }
        };

        if !response.status().is_success() {
            return None;
        }

        let document = match response.json::<PackageDocument>().await {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(package, error = %e, "package document unreadable");
                return None;
            }
        };

        document
            .dist_tags
            .latest
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl Default for LatestResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a package name for a registry URL; scoped packages keep the `@`
/// but escape the separator (`@scope/name` -> `@scope%2Fname`).
fn encode_package_name(package: &str) -> String {
    if package.starts_with('@') {
        package.replace('/', "%2F")
    } else {
        package.to_string()
    }
}

/// Interpret one view probe's output. JSON-looking text (npm --json prints
/// a quoted string or an object) is parsed for a bare string or `.version`
/// field; anything else is taken verbatim.
fn parse_view_output(text: &str) -> Option<String> {
    let trimmed = text.trim();

    if trimmed.starts_with('"') || trimmed.starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
        return match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Object(map) => map
                .get("version")
                .and_then(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            _ => None,
        };
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{failed_output, ScriptedRunner};
    use mockito::Server;

    #[test]
    fn view_output_accepts_plain_text() {
        assert_eq!(parse_view_output("1.4.0\n").as_deref(), Some("1.4.0"));
    }

    #[test]
    fn view_output_parses_quoted_string() {
        assert_eq!(parse_view_output("\"1.4.0\"").as_deref(), Some("1.4.0"));
    }

    #[test]
    fn view_output_parses_version_field() {
        assert_eq!(
            parse_view_output(r#"{"version":"1.4.0","name":"x"}"#).as_deref(),
            Some("1.4.0")
        );
    }

    #[test]
    fn view_output_rejects_json_without_version() {
        assert_eq!(parse_view_output(r#"{"name":"x"}"#), None);
        assert_eq!(parse_view_output("{broken"), None);
    }

    #[test]
    fn scoped_names_escape_the_separator() {
        assert_eq!(
            encode_package_name("@anthropic-ai/claude-code"),
            "@anthropic-ai%2Fclaude-code"
        );
        assert_eq!(encode_package_name("opencode-ai"), "opencode-ai");
    }

    #[tokio::test]
    async fn view_probe_wins_without_touching_the_registry() {
        let runner = ScriptedRunner::from_stdout(&["2.0.0"]);
        let resolver = LatestResolver::with_registry("http://127.0.0.1:1");

        let version = resolver
            .resolve("opencode-ai", PackageManager::Npm, &runner)
            .await;

        assert_eq!(version.as_deref(), Some("2.0.0"));
        assert_eq!(runner.call_count(), 1);
    }

    #[tokio::test]
    async fn registry_latest_covers_failing_view_probes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/@anthropic-ai%2Fclaude-code/latest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"version":"1.4.0","name":"@anthropic-ai/claude-code"}"#)
            .create_async()
            .await;

        let runner = ScriptedRunner::new(vec![
            failed_output("npm: command not found"),
            failed_output("npm: command not found"),
        ]);
        let resolver = LatestResolver::with_registry(&server.url());

        let version = resolver
            .resolve("@anthropic-ai/claude-code", PackageManager::Npm, &runner)
            .await;

        mock.assert_async().await;
        assert_eq!(version.as_deref(), Some("1.4.0"));
    }

    #[tokio::test]
    async fn package_document_is_the_last_resort() {
        let mut server = Server::new_async().await;
        let latest_mock = server
            .mock("GET", "/opencode-ai/latest")
            .with_status(404)
            .create_async()
            .await;
        let doc_mock = server
            .mock("GET", "/opencode-ai")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"opencode-ai","dist-tags":{"latest":"0.9.2"}}"#)
            .create_async()
            .await;

        let runner = ScriptedRunner::new(vec![
            failed_output("npm: command not found"),
            failed_output("npm: command not found"),
        ]);
        let resolver = LatestResolver::with_registry(&server.url());

        let version = resolver
            .resolve("opencode-ai", PackageManager::Npm, &runner)
            .await;

        latest_mock.assert_async().await;
        doc_mock.assert_async().await;
        assert_eq!(version.as_deref(), Some("0.9.2"));
    }

    #[tokio::test]
    async fn every_stage_failing_returns_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(500)
            .expect_at_least(2)
            .create_async()
            .await;

        let runner = ScriptedRunner::new(vec![
            failed_output("npm: command not found"),
            failed_output("npm: command not found"),
        ]);
        let resolver = LatestResolver::with_registry(&server.url());

        let version = resolver
            .resolve("opencode-ai", PackageManager::Npm, &runner)
            .await;

        assert_eq!(version, None);
    }
}
