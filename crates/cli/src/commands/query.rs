//! `truthlens query`: One-shot query from the command line.

use truthlens_config::AppConfig;
use truthlens_core::query::Query;

pub async fn run(text: &str) -> truthlens_core::Result<()> {
    let query = Query::new(text)?;
    let config = AppConfig::load()?;

    let orchestrator = truthlens_agent::build_from_config(&config);
    let result = orchestrator.handle(query).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
