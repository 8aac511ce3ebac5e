use anyhow::{Context, Result};
use rmcp::{model::CallToolRequestParam, service::ServiceExt, transport::TokioChildProcess};
use std::collections::HashSet;
use std::time::Duration;
use tokio::process::Command;

mod support;

#[tokio::test]
async fn mcp_exposes_tools_over_stdio() -> Result<()> {
    let bin = support::locate_apiscope_mcp_bin()?;

    let mut cmd = Command::new(bin);
    cmd.env("RUST_LOG", "warn");

    let transport = TokioChildProcess::new(cmd).context("spawn mcp server")?;
    let service = tokio::time::timeout(Duration::from_secs(10), ().serve(transport))
        .await
        .context("timeout starting MCP server")??;

    let tools = tokio::time::timeout(
        Duration::from_secs(10),
        service.list_tools(Default::default()),
    )
    .await
    .context("timeout listing tools")??;
    let tool_names: HashSet<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    for expected in [
        "load_openapi_spec",
        "search_endpoints",
        "get_endpoint_details",
        "get_api_analytics",
        "list_schemas",
        "analyze_schema",
        "compare_schemas",
    ] {
        assert!(tool_names.contains(expected), "missing tool: {expected}");
    }

    let args = serde_json::json!({ "source": support::PETSTORE });
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "load_openapi_spec".into(),
            arguments: args.as_object().cloned(),
        }),
    )
    .await
    .context("timeout calling load_openapi_spec")??;
    assert_ne!(result.is_error, Some(true), "load_openapi_spec returned error");
    let summary = support::result_json(&result)?;
    assert_eq!(summary["endpointCount"], 3);

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "list_schemas".into(),
            arguments: Some(serde_json::Map::new()),
        }),
    )
    .await
    .context("timeout calling list_schemas")??;
    assert_eq!(support::result_json(&result)?["total"], 2);

    service.cancel().await.context("shutdown mcp service")?;
    Ok(())
}
