#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pojok_server::run().await
}
