use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    listview_cli::main_entry().await
}
