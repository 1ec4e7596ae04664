use dotenv::dotenv;
use leadflow_backend::app::app::App;
use leadflow_backend::util::logger::Logger;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // Load environment variables first so the logger sees LOG_DIR and RUST_LOG
    let dotenv_result = dotenv();

    let _logger = Logger::new().expect("Failed to initialize logging");
    info!("Starting Leadflow Backend");
    match dotenv_result {
        Ok(_) => info!("Loaded .env file"),
        Err(e) => warn!("Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new().await;
    app.start().await;
}
