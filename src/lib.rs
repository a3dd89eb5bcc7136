//! RuboCop exposed as MCP tools.
//!
//! Layers, leaves first:
//!   rubocop   - runner (subprocess) + argument builders + JSON report model
//!   format    - offense / cop list / department summary rendering
//!   auto_lint - in-memory auto-lint mode
//!   error     - failure taxonomy rendered to client text
//!   mcp       - tool registry + rmcp `ServerHandler`

pub mod auto_lint;
pub mod error;
pub mod format;
pub mod mcp;
pub mod rubocop;
pub mod utils;
