use std::collections::BTreeMap;

/// Three-valued classification of a tool's version situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionStatus {
    UpToDate,
    Outdated,
    Unknown,
}

impl VersionStatus {
    /// Derive status purely from the two version strings. Whitespace-only
    /// strings count as absent. Comparison is trimmed string equality; a
    /// tool reporting anything other than the published version is treated
    /// as outdated.
    pub fn derive(installed: Option<&str>, latest: Option<&str>) -> Self {
        let installed = installed.map(str::trim).filter(|s| !s.is_empty());
        let latest = latest.map(str::trim).filter(|s| !s.is_empty());

        match (installed, latest) {
            (Some(a), Some(b)) if a == b => VersionStatus::UpToDate,
            (Some(_), Some(_)) => VersionStatus::Outdated,
            _ => VersionStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VersionStatus::UpToDate => "up to date",
            VersionStatus::Outdated => "outdated",
            VersionStatus::Unknown => "unknown",
        }
    }
}

/// Per-tool record of what the resolvers last reported.
#[derive(Debug, Clone, Default)]
pub struct ToolState {
    pub installed: Option<String>,
    pub latest: Option<String>,
}

impl ToolState {
    pub fn status(&self) -> VersionStatus {
        VersionStatus::derive(self.installed.as_deref(), self.latest.as_deref())
    }
}

/// State container owned by the command layer. All mutation goes through
/// the record methods, keyed by tool id; status is always re-derived, never
/// stored separately.
#[derive(Debug, Default)]
pub struct StatusBoard {
    entries: BTreeMap<String, ToolState>,
}

impl StatusBoard {
    pub fn new() -> Self {
        StatusBoard::default()
    }

    pub fn record_installed(&mut self, id: &str, installed: Option<String>) {
        self.entries.entry(id.to_string()).or_default().installed = installed;
    }

    pub fn record_latest(&mut self, id: &str, latest: Option<String>) {
        self.entries.entry(id.to_string()).or_default().latest = latest;
    }

    pub fn record(&mut self, id: &str, installed: Option<String>, latest: Option<String>) {
        let entry = self.entries.entry(id.to_string()).or_default();
        entry.installed = installed;
        entry.latest = latest;
    }

    pub fn get(&self, id: &str) -> ToolState {
        self.entries.get(id).cloned().unwrap_or_default()
    }

    pub fn status(&self, id: &str) -> VersionStatus {
        self.get(id).status()
    }
}
