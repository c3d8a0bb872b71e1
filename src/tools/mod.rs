use anyhow::{anyhow, Result};

/// How a tool's update is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMechanism {
    /// The tool ships its own update subcommand, run as `<command> <args>`.
    Native { args: &'static [&'static str] },
    /// Reinstall the package globally through the preferred package manager.
    GlobalInstall,
}

/// Static description of one supported assistant. Built into the binary;
/// never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    /// Stable identifier used on the CLI and in settings.
    pub id: &'static str,
    /// Human-readable name.
    pub title: &'static str,
    /// npm package the tool is published as.
    pub package: &'static str,
    /// Local binary name probed for the installed version.
    pub command: &'static str,
    pub update: UpdateMechanism,
}

const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        id: "claude-code",
        title: "Claude Code",
        package: "@anthropic-ai/claude-code",
        command: "claude",
        update: UpdateMechanism::Native { args: &["update"] },
    },
    ToolDescriptor {
        id: "codex",
        title: "Codex CLI",
        package: "@openai/codex",
        command: "codex",
        update: UpdateMechanism::GlobalInstall,
    },
    ToolDescriptor {
        id: "gemini-cli",
        title: "Gemini CLI",
        package: "@google/gemini-cli",
        command: "gemini",
        update: UpdateMechanism::GlobalInstall,
    },
    ToolDescriptor {
        id: "opencode",
        title: "opencode",
        package: "opencode-ai",
        command: "opencode",
        update: UpdateMechanism::Native {
            args: &["upgrade"],
        },
    },
];

/// All supported tools, in display order.
pub fn all_tools() -> &'static [ToolDescriptor] {
    TOOLS
}

/// Look up a tool by its identifier.
pub fn get_tool(id: &str) -> Result<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.id == id).ok_or_else(|| {
        anyhow!(
            "Unknown tool: '{}'. Supported tools: {}.",
            id,
            TOOLS
                .iter()
                .map(|t| t.id)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_every_listed_tool() {
        for tool in all_tools() {
            assert_eq!(get_tool(tool.id).unwrap().id, tool.id);
        }
    }

    #[test]
    fn lookup_rejects_unknown_id_with_supported_list() {
        let err = get_tool("not-a-tool").unwrap_err().to_string();
        assert!(err.contains("not-a-tool"));
        assert!(err.contains("claude-code"));
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = all_tools().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all_tools().len());
    }
}
