//! MCP server surface.
//!
//! RubocopServer implements rmcp's `ServerHandler`:
//!   list_tools -> static registry (tool::descriptors)
//!   call_tool  -> dispatch(name, arguments)
//!
//! `dispatch` never fails at the protocol level: unknown tools and handler
//! errors come back as error-flagged text content.

pub mod tool;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};

use crate::auto_lint::{AutoLint, AutoLintState};
use crate::error::{Result, RubocopError};
use crate::format;
use crate::rubocop::{self, LintParams, Runner};
use tool::{
    AutoGenConfigArgs, LintArgs, ListCopsArgs, SetAutoLintArgs, ShowCopArgs, ToolName, parse_args,
};

const INSTRUCTIONS: &str = "RuboCop tools for Ruby code. Use 'rubocop_lint' to check files, \
    'rubocop_list_cops' / 'rubocop_show_cop' to explore cops, and 'rubocop_set_auto_lint' to \
    turn on reminders to lint after editing Ruby files.";

#[derive(Debug, Clone)]
pub struct RubocopServer {
    runner: Runner,
    auto_lint: AutoLint,
}

impl RubocopServer {
    pub fn new(runner: Runner, auto_lint: AutoLint) -> Self {
        Self { runner, auto_lint }
    }

    pub fn auto_lint(&self) -> &AutoLint {
        &self.auto_lint
    }

    /// Route a call by name. Always yields a single text content block.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let outcome = match ToolName::from_name(name) {
            Some(tool) => {
                tracing::info!(tool = %tool, "tool call");
                self.handle(tool, arguments).await
            }
            None => Err(RubocopError::UnknownTool(name.to_string())),
        };

        match outcome {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call failed");
                CallToolResult::error(vec![Content::text(err.render())])
            }
        }
    }

    async fn handle(&self, tool: ToolName, arguments: Option<JsonObject>) -> Result<String> {
        match tool {
            ToolName::Lint => self.lint(parse_args(tool, arguments)?).await,
            ToolName::ListCops => self.list_cops(parse_args(tool, arguments)?).await,
            ToolName::ShowCop => self.show_cop(parse_args(tool, arguments)?).await,
            ToolName::AutoGenConfig => self.auto_gen_config(parse_args(tool, arguments)?).await,
            ToolName::SetAutoLint => Ok(self.set_auto_lint(parse_args(tool, arguments)?)),
            ToolName::GetAutoLintStatus => Ok(self.auto_lint.format_status()),
        }
    }

    async fn lint(&self, args: LintArgs) -> Result<String> {
        // One snapshot of the mode drives both the -A flag and the hint.
        let mode = self.auto_lint.config();
        let auto_lint_enabled = mode.enabled;
        let params = lint_params(args, mode);

        let output = self.runner.execute(&params.to_args()).await?;
        let report = rubocop::parse_report(&output.stdout)?;
        tracing::debug!(
            rubocop_version = %report.metadata.rubocop_version,
            offenses = report.summary.offense_count,
            target_files = report.summary.target_file_count,
            inspected_files = report.summary.inspected_file_count,
            "lint finished"
        );

        let mut message = format::format_offenses(&report);
        if auto_lint_enabled && report.summary.offense_count > 0 {
            message.push_str(
                "\n💡 Auto-lint is enabled. Consider running with auto_correct: true to fix issues automatically.",
            );
        }
        Ok(message)
    }

    async fn list_cops(&self, args: ListCopsArgs) -> Result<String> {
        let output = self
            .runner
            .execute(&rubocop::show_cops_args(None))
            .await?;

        let message = match args.department.as_deref().filter(|d| !d.is_empty()) {
            None => format::format_department_summary(&output.stdout),
            Some(department) => format::format_cop_list(
                &output.stdout,
                department,
                args.limit.unwrap_or(format::DEFAULT_PAGE_LIMIT),
                args.offset.unwrap_or(0),
            ),
        };
        Ok(message)
    }

    async fn show_cop(&self, args: ShowCopArgs) -> Result<String> {
        let output = self
            .runner
            .execute(&rubocop::show_cops_args(Some(&args.cop_name)))
            .await?;
        Ok(format!("Details for {}:\n\n{}", args.cop_name, output.stdout))
    }

    async fn auto_gen_config(&self, args: AutoGenConfigArgs) -> Result<String> {
        let path = args.path.as_deref().unwrap_or(".");
        let output = self
            .runner
            .execute(&rubocop::auto_gen_config_args(path))
            .await?;
        Ok(format!(
            "Configuration generated successfully!\n\n{}\n{}",
            output.stdout, output.stderr
        ))
    }

    fn set_auto_lint(&self, args: SetAutoLintArgs) -> String {
        self.auto_lint.set_config(args.enabled, args.auto_correct);
        let state = self.auto_lint.config();
        tracing::info!(enabled = state.enabled, auto_correct = state.auto_correct, "auto-lint updated");

        let status = if state.enabled { "enabled" } else { "disabled" };
        let with_fix = if state.auto_correct {
            " with auto-correction"
        } else {
            ""
        };
        let note = if state.enabled {
            "The AI assistant will now be reminded to run RuboCop after generating or modifying Ruby files."
        } else {
            "Auto-lint reminders are now disabled."
        };
        format!("✓ Auto-lint has been {status}{with_fix}.\n\n{note}")
    }
}

/// Map a lint call onto linter flags under one auto-lint snapshot.
fn lint_params(args: LintArgs, mode: AutoLintState) -> LintParams {
    LintParams {
        auto_correct: mode.should_auto_correct(args.auto_correct),
        path: args.path,
        only: args.only,
        except: args.except,
    }
}

impl ServerHandler for RubocopServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(tool::descriptors()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self.dispatch(&request.name, request.arguments).await)
    }
}
