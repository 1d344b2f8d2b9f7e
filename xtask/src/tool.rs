//! External tools `cargo xtask gen` shells out to.
//!
//! Looks executables up in PATH and reports missing ones with an install hint.

use std::path::PathBuf;
use std::process::Command;

use owo_colors::OwoColorize;
use thiserror::Error;

/// External tools that xtask depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// tree-sitter CLI for generating parsers
    TreeSitter,
    /// Node.js, which the tree-sitter CLI uses to evaluate grammar.js
    Node,
}

/// Tools needed for `cargo xtask gen`.
pub const GEN_TOOLS: &[Tool] = &[Tool::TreeSitter, Tool::Node];

impl Tool {
    /// The executable name to search for in PATH.
    pub fn executable_name(self) -> &'static str {
        match self {
            Tool::TreeSitter => "tree-sitter",
            Tool::Node => "node",
        }
    }

    /// Human-readable name for error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Tool::TreeSitter => "tree-sitter",
            Tool::Node => "Node.js",
        }
    }

    /// Installation instructions for this tool (platform-aware).
    pub fn install_hint(self) -> &'static str {
        match self {
            Tool::TreeSitter => {
                if cfg!(target_os = "macos") {
                    "brew install tree-sitter"
                } else {
                    "cargo install tree-sitter-cli --locked"
                }
            }
            Tool::Node => {
                if cfg!(target_os = "macos") {
                    "brew install node"
                } else {
                    "https://nodejs.org/en/download"
                }
            }
        }
    }

    /// Look up the tool in PATH and return its absolute path.
    pub fn find(self) -> Result<ToolPath, ToolNotFound> {
        match which::which(self.executable_name()) {
            Ok(path) => Ok(ToolPath { path }),
            Err(_) => Err(ToolNotFound { tool: self }),
        }
    }
}

/// Check the given tools and print a report. Returns true if all are available.
pub fn check_tools_or_report(tools: &[Tool]) -> bool {
    let missing: Vec<Tool> = tools.iter().copied().filter(|t| t.find().is_err()).collect();
    if missing.is_empty() {
        return true;
    }

    eprintln!("Missing Tools:");
    eprintln!("==============");
    for tool in &missing {
        eprintln!("{} {}", "✗".red().bold(), tool.display_name().bold());
        eprintln!("    {}", tool.install_hint().yellow());
    }
    false
}

/// A resolved tool with its absolute path.
#[derive(Debug, Clone)]
pub struct ToolPath {
    path: PathBuf,
}

impl ToolPath {
    /// Create a new Command for this tool.
    pub fn command(&self) -> Command {
        Command::new(&self.path)
    }
}

/// Error when a required tool is not found in PATH.
#[derive(Debug, Error)]
#[error("{} not found in PATH\n\n  {}", .tool.display_name(), .tool.install_hint())]
pub struct ToolNotFound {
    pub tool: Tool,
}
