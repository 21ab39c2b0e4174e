#[tokio::main]
async fn main() {
    if let Err(e) = farmconnect::run().await {
        tracing::error!("FarmConnect stopped: {}", e);
        std::process::exit(1);
    }
}
