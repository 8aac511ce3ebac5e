//! apiscope MCP Server
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "apiscope": {
//!       "command": "apiscope-mcp"
//!     }
//!   }
//! }
//! ```
//!
//! `APISCOPE_MAX_FILE_SIZE` and `APISCOPE_CHUNK_SIZE` tune the loader.

use anyhow::Result;
use apiscope_explorer::LoaderConfig;
use apiscope_mcp::ApiScopeService;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure logging to stderr only (stdout is for MCP protocol)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting apiscope MCP server");

    let service = ApiScopeService::new(LoaderConfig::from_env())?;
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("apiscope MCP server stopped");
    Ok(())
}
