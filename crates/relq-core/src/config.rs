//! Configuration types and parsing for relq.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How clauses of a built statement are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Single line, clauses separated by one space (default)
    #[default]
    Compact,
    /// One clause per line, each join on its own indented line
    Multiline,
}

/// How comparison operands are written into the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// `@0`, `@1`, ... placeholders plus a parameter list (default)
    #[default]
    Parameterized,
    /// Operands inlined as dialect literals, no parameters
    Inline,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Parameterized => write!(f, "parameterized"),
            RenderMode::Inline => write!(f, "inline"),
        }
    }
}

/// Statement rendering configuration from relq.yml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Clause layout
    #[serde(default)]
    pub layout: Layout,

    /// Default render mode used by `build()`
    #[serde(default)]
    pub mode: RenderMode,

    /// Indentation for join lines in the multiline layout
    #[serde(default = "default_indent")]
    pub indent: String,
}

fn default_indent() -> String {
    "\t".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            mode: RenderMode::default(),
            indent: default_indent(),
        }
    }
}

impl QueryConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a directory
    /// Looks for relq.yml or relq.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("relq.yml");
        let yaml_path = dir.join("relq.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> CoreResult<Self> {
        let config: QueryConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.indent.is_empty() || !self.indent.chars().all(char::is_whitespace) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "indent must be non-empty whitespace, got {:?}",
                    self.indent
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
