//! End-to-end: spawn the server binary over stdio and drive it with an rmcp client.

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
use serde_json::{Value, json};
use tokio::process::Command;

async fn connect(rubocop_command: &str) -> Result<RunningService<RoleClient, ()>> {
    let transport = TokioChildProcess::new(
        Command::new(env!("CARGO_BIN_EXE_rubocop-mcp")).configure(|c| {
            c.arg("--rubocop-command").arg(rubocop_command);
            c.arg("--quiet");
            c.stderr(std::process::Stdio::null());
        }),
    )?;
    ().serve(transport)
        .await
        .context("Failed to spawn & initialize rubocop-mcp")
}

async fn call(
    service: &RunningService<RoleClient, ()>,
    name: &str,
    arguments: Value,
) -> Result<(String, bool)> {
    let result: CallToolResult = service
        .call_tool(CallToolRequestParam {
            name: name.to_string().into(),
            arguments: arguments.as_object().cloned(),
        })
        .await
        .with_context(|| format!("call to {name} failed at the protocol level"))?;

    let v = serde_json::to_value(&result)?;
    let text = v["content"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|c| c["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    Ok((text, v["isError"].as_bool().unwrap_or(false)))
}

#[tokio::test]
async fn lists_all_tools_in_order() -> Result<()> {
    let service = connect("rubocop-not-installed-anywhere").await?;
    let tools = service.list_tools(Default::default()).await?;
    let names: Vec<String> = tools.tools.iter().map(|t| t.name.to_string()).collect();
    assert_eq!(
        names,
        vec![
            "rubocop_lint",
            "rubocop_list_cops",
            "rubocop_show_cop",
            "rubocop_auto_gen_config",
            "rubocop_set_auto_lint",
            "rubocop_get_auto_lint_status",
        ]
    );
    let _ = service.cancel().await;
    Ok(())
}

#[tokio::test]
async fn auto_lint_round_trip_over_protocol() -> Result<()> {
    let service = connect("rubocop-not-installed-anywhere").await?;

    let (text, is_error) = call(
        &service,
        "rubocop_set_auto_lint",
        json!({"enabled": true, "auto_correct": true}),
    )
    .await?;
    assert!(!is_error);
    assert!(text.contains("enabled with auto-correction"));

    let (status, _) = call(&service, "rubocop_get_auto_lint_status", json!({})).await?;
    assert!(status.contains("• Auto-lint: enabled"));
    assert!(status.contains("• Auto-correction: enabled"));

    let _ = service.cancel().await;
    Ok(())
}

#[tokio::test]
async fn failures_are_error_flagged_content() -> Result<()> {
    let service = connect("rubocop-not-installed-anywhere").await?;

    let (text, is_error) = call(&service, "rubocop_fly", json!({})).await?;
    assert!(is_error);
    assert!(text.contains("rubocop_fly"));

    let (text, is_error) = call(&service, "rubocop_lint", json!({"path": "."})).await?;
    assert!(is_error);
    assert!(text.contains("RuboCop is not installed"));

    let _ = service.cancel().await;
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn lint_through_configured_command() -> Result<()> {
    let report = r#"{"files":[{"path":"app/a.rb","offenses":[{"severity":"error","message":"syntax","cop_name":"Lint/Syntax","location":{"line":2,"column":1}}]}],"summary":{"offense_count":1,"target_file_count":1,"inspected_file_count":1}}"#;
    // The report rides in as $0; the lint argv follows as $1...
    let command = format!("sh -c 'echo \"$0\"; exit 1' '{report}'");
    let service = connect(&command).await?;

    let (text, is_error) = call(&service, "rubocop_lint", json!({"path": "app"})).await?;
    assert!(!is_error, "{text}");
    assert!(text.starts_with("Found 1 offense(s) in 1 file(s):"));
    assert!(text.contains("❌ Line 2:1: syntax"));

    let _ = service.cancel().await;
    Ok(())
}
