use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    apiscope_cli::main_entry().await
}
