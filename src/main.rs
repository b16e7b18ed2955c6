use dotenvy::dotenv;
use kb_navigator::config::Settings;
use kb_navigator::logging::{init_logging, RedactionPatterns};
use kb_navigator::runner::run_bot;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Patterns must exist before the first log line
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(patterns);

    info!("Starting knowledge base navigator...");

    let settings = init_settings();

    run_bot(settings).await;

    info!("Bot stopped.");
    Ok(())
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}
