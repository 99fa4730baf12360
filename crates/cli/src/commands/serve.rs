//! `truthlens serve`: Start the HTTP API server.

use truthlens_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let flags = config.feature_flags();
    println!("TruthLens Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Real summarization: {}", flags.real_summarization);
    println!("   Real verification: {}", flags.real_verification);

    truthlens_gateway::start(config).await?;

    Ok(())
}
