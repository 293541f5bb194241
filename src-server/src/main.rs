mod config;
mod constants;
mod server;

use std::path::PathBuf;

use config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize logging; RUST_LOG overrides the default filter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Image browser server starting...");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(ServerConfig::default_path);

    let config = match config_path {
        Some(path) => match ServerConfig::load(&path).await {
            Ok(config) => {
                if !path.exists() {
                    // First start: leave an editable file behind
                    if let Err(e) = config.save(&path).await {
                        log::warn!("Failed to write default configuration: {}", e);
                    }
                }
                config
            }
            Err(e) => {
                log::error!("Failed to load configuration from {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("No config directory available, using defaults");
            ServerConfig::default()
        }
    };

    if let Err(e) = server::serve(config).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
