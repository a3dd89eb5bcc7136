/*!
Tool registry.

`ToolName` is the closed set of operations the server answers to. Each
variant owns its descriptor (name, description, input schema); argument
structs below are what the handlers deserialize a call's `arguments` into.

Helpers:
  - ToolName::ALL / from_name / as_str
  - ToolName::descriptor -> rmcp Tool
  - parse_args
*/

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use rmcp::model::{JsonObject, Tool};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::error::Result;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ToolName {
    Lint,
    ListCops,
    ShowCop,
    AutoGenConfig,
    SetAutoLint,
    GetAutoLintStatus,
}

impl ToolName {
    /// Registration order (also the `tools/list` order).
    pub const ALL: [ToolName; 6] = [
        ToolName::Lint,
        ToolName::ListCops,
        ToolName::ShowCop,
        ToolName::AutoGenConfig,
        ToolName::SetAutoLint,
        ToolName::GetAutoLintStatus,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ToolName::Lint => "rubocop_lint",
            ToolName::ListCops => "rubocop_list_cops",
            ToolName::ShowCop => "rubocop_show_cop",
            ToolName::AutoGenConfig => "rubocop_auto_gen_config",
            ToolName::SetAutoLint => "rubocop_set_auto_lint",
            ToolName::GetAutoLintStatus => "rubocop_get_auto_lint_status",
        }
    }

    /// Exact (case-sensitive) lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub const fn description(self) -> &'static str {
        match self {
            ToolName::Lint => {
                "Run RuboCop (with Rails cops) on Ruby files to check for style violations and \
                 potential issues. Returns detailed information about each offense including \
                 severity, location, and whether it's auto-correctable."
            }
            ToolName::ListCops => {
                "List RuboCop cops by department. Without department parameter, returns a \
                 summary of all departments. With department parameter (e.g., 'Style', 'Lint'), \
                 returns cops for that specific department with pagination support."
            }
            ToolName::ShowCop => {
                "Show detailed information about a specific RuboCop cop, including its \
                 description, default configuration, and examples."
            }
            ToolName::AutoGenConfig => {
                "Generate a .rubocop_todo.yml file with all current offenses disabled. Useful \
                 for gradually adopting RuboCop in existing projects."
            }
            ToolName::SetAutoLint => {
                "Enable or disable automatic linting mode. When enabled, the AI assistant will \
                 be reminded to run RuboCop after generating or modifying Ruby files."
            }
            ToolName::GetAutoLintStatus => "Get the current auto-lint status and configuration.",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            ToolName::Lint => json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the Ruby file or directory to lint"
                    },
                    "auto_correct": {
                        "type": "boolean",
                        "description": "Whether to automatically fix correctable offenses (default: false)",
                        "default": false
                    },
                    "only": {
                        "type": "string",
                        "description": "Run only the specified cop(s), e.g., 'Rails/ActiveRecordAliases' or 'Style,Lint'"
                    },
                    "except": {
                        "type": "string",
                        "description": "Exclude the specified cop(s) from the run"
                    }
                },
                "required": ["path"]
            }),
            ToolName::ListCops => json!({
                "type": "object",
                "properties": {
                    "department": {
                        "type": "string",
                        "description": "Filter cops by department (e.g., 'Style', 'Lint', 'Layout', 'Metrics', 'Naming', 'Security'). Omit to see department summary."
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of cops to return (default: 50, max: 100)",
                        "default": 50
                    },
                    "offset": {
                        "type": "number",
                        "description": "Number of cops to skip for pagination (default: 0)",
                        "default": 0
                    }
                }
            }),
            ToolName::ShowCop => json!({
                "type": "object",
                "properties": {
                    "cop_name": {
                        "type": "string",
                        "description": "The name of the cop to show details for (e.g., 'Rails/ActiveRecordAliases')"
                    }
                },
                "required": ["cop_name"]
            }),
            ToolName::AutoGenConfig => json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Path to the directory to generate config for (default: current directory)",
                        "default": "."
                    }
                }
            }),
            ToolName::SetAutoLint => json!({
                "type": "object",
                "properties": {
                    "enabled": {
                        "type": "boolean",
                        "description": "True to enable auto-lint, false to disable"
                    },
                    "auto_correct": {
                        "type": "boolean",
                        "description": "Whether to automatically fix issues when auto-linting (default: false)",
                        "default": false
                    }
                },
                "required": ["enabled"]
            }),
            ToolName::GetAutoLintStatus => json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn descriptor(self) -> Tool {
        let schema: JsonObject = match self.input_schema() {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };
        Tool::new(self.as_str(), self.description(), Arc::new(schema))
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All descriptors in registration order.
pub fn descriptors() -> Vec<Tool> {
    ToolName::ALL.into_iter().map(ToolName::descriptor).collect()
}

/// Deserialize a call's arguments (absent = empty object).
pub fn parse_args<T: DeserializeOwned>(tool: ToolName, arguments: Option<JsonObject>) -> Result<T> {
    let value = Value::Object(arguments.unwrap_or_default());
    let args = serde_json::from_value(value)
        .with_context(|| format!("invalid arguments for {tool}"))?;
    Ok(args)
}

/* ---- Argument shapes ---- */

#[derive(Debug, Deserialize)]
pub struct LintArgs {
    pub path: String,
    #[serde(default)]
    pub auto_correct: bool,
    #[serde(default)]
    pub only: Option<String>,
    #[serde(default)]
    pub except: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListCopsArgs {
    #[serde(default, alias = "category")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "non_negative_count")]
    pub limit: Option<usize>,
    #[serde(default, deserialize_with = "non_negative_count")]
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ShowCopArgs {
    #[serde(alias = "rule")]
    pub cop_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AutoGenConfigArgs {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetAutoLintArgs {
    pub enabled: bool,
    #[serde(default)]
    pub auto_correct: bool,
}

/// JSON "number" that must be a non-negative count; fractions truncate.
fn non_negative_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    match Option::<f64>::deserialize(d)? {
        None => Ok(None),
        Some(n) if n.is_finite() && n >= 0.0 => Ok(Some(n as usize)),
        Some(n) => Err(D::Error::custom(format!(
            "expected a non-negative number, got {n}"
        ))),
    }
}
