//! CourseBundler server binary.

use coursebundler_server::{CourseServer, init_logging, load_config_or_default};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::var("COURSEBUNDLER_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = load_config_or_default(&path)?;

    init_logging(&config.server.log_level);
    tracing::info!(config = %path, "Configuration loaded");

    let server = CourseServer::new(config);
    server.run().await?;

    Ok(())
}
