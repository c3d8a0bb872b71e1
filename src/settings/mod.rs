use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Package manager used for registry view probes and global installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Ordered `view <pkg> version` invocations to try. yarn and bun have no
    /// stable view subcommand, so they query through npm.
    pub fn view_candidates(&self, package: &str) -> Vec<Vec<String>> {
        let owned = |parts: &[&str]| parts.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut candidates = match self {
            PackageManager::Npm | PackageManager::Yarn | PackageManager::Bun => vec![
                owned(&["npm", "view", package, "version"]),
                owned(&["npm", "view", package, "version", "--json"]),
            ],
            PackageManager::Pnpm => vec![
                owned(&["pnpm", "view", package, "version"]),
                owned(&["pnpm", "view", package, "version", "--json"]),
            ],
        };

        if *self == PackageManager::Pnpm {
            candidates.push(owned(&["npm", "view", package, "version"]));
        }

        candidates
    }

    /// Global-install argv for `<package>@latest`.
    pub fn global_install_args(&self, package: &str) -> Vec<String> {
        let spec = format!("{package}@latest");
        match self {
            PackageManager::Npm => vec!["npm".into(), "install".into(), "-g".into(), spec],
            PackageManager::Pnpm => vec!["pnpm".into(), "add".into(), "-g".into(), spec],
            PackageManager::Yarn => vec!["yarn".into(), "global".into(), "add".into(), spec],
            PackageManager::Bun => vec!["bun".into(), "add".into(), "-g".into(), spec],
        }
    }
}

/// Persisted user preferences. Serialized as camelCase JSON for
/// compatibility with the settings blob older releases wrote. Every field
/// has a default so a partial blob loads cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Tool used by `check` and `update` when no --tool is given.
    pub default_tool: String,
    pub package_manager: PackageManager,
    /// When version extraction finds no semver pattern in a probe's output,
    /// accept the raw text as a best-effort version.
    pub raw_version_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            default_tool: "claude-code".to_string(),
            package_manager: PackageManager::Npm,
            raw_version_fallback: true,
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".aiup")
            .join("settings.json")
    }

    /// Load settings, merging the persisted blob over defaults. Missing
    /// files and unreadable blobs fall back to defaults; a settings problem
    /// must never take the CLI down.
    pub fn load(path: &Path) -> Settings {
        if !path.exists() {
            return Settings::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "settings blob unreadable, using defaults");
                    Settings::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "settings file unreadable, using defaults");
                Settings::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).context("Failed to write settings")?;
        Ok(())
    }
}
