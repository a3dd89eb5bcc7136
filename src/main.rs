use anyhow::{Context, Result};
use clap::Parser;
use rmcp::ServiceExt;
use rmcp::transport::stdio;

use rubocop_mcp::auto_lint::AutoLint;
use rubocop_mcp::mcp::RubocopServer;
use rubocop_mcp::rubocop::{DEFAULT_MAX_BUFFER, Runner};
use rubocop_mcp::utils;

/// RuboCop MCP server (stdio).
///
/// Exposes RuboCop as MCP tools:
///   rubocop_lint                  lint files / directories (optionally auto-correct)
///   rubocop_list_cops             department summary, or paginated cops of one department
///   rubocop_show_cop              details for one cop
///   rubocop_auto_gen_config       generate .rubocop_todo.yml
///   rubocop_set_auto_lint         toggle auto-lint mode (in memory)
///   rubocop_get_auto_lint_status  report auto-lint mode
///
/// Global flags / env:
///   -v / -vv              Increase verbosity (logs go to stderr)
///   -q / --quiet          Errors only
///   --rubocop-command     Command used to run RuboCop (or RUBOCOP_COMMAND)
///   --max-buffer          Byte cap per captured stream (or RUBOCOP_MCP_MAX_BUFFER)
///   RUST_LOG              Overrides the derived log filter
///
/// Examples:
///   rubocop-mcp
///   rubocop-mcp --rubocop-command "bundle exec rubocop" -v
#[derive(Parser, Debug)]
#[command(
    name = "rubocop-mcp",
    version,
    about = "RuboCop MCP server - lint, auto-correct and explore cops over stdio",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Command used to run RuboCop (shell-style quoting, no shell involved)
    #[arg(
        long = "rubocop-command",
        env = "RUBOCOP_COMMAND",
        value_name = "COMMAND",
        default_value = "rubocop"
    )]
    rubocop_command: String,

    /// Maximum bytes captured from each of RuboCop's stdout / stderr
    #[arg(
        long = "max-buffer",
        env = "RUBOCOP_MCP_MAX_BUFFER",
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_BUFFER
    )]
    max_buffer: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let runner = Runner::from_command_line(&cli.rubocop_command, cli.max_buffer)
        .with_context(|| format!("Invalid RuboCop command: '{}'", cli.rubocop_command))?;
    tracing::info!(
        program = runner.program(),
        base_args = ?runner.base_args(),
        max_buffer = cli.max_buffer,
        log_level = level.as_str(),
        "starting RuboCop MCP server on stdio"
    );

    let service = RubocopServer::new(runner, AutoLint::new())
        .serve(stdio())
        .await
        .context("Failed to start MCP stdio transport")?;

    service
        .waiting()
        .await
        .context("MCP service terminated abnormally")?;
    tracing::info!("client disconnected, shutting down");
    Ok(())
}
