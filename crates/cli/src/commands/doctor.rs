//! `truthlens doctor`: Diagnose configuration.

use truthlens_config::AppConfig;

#[derive(Debug, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
}

struct Check {
    status: Status,
    message: String,
}

impl Check {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: Status::Warn,
            message: message.into(),
        }
    }
}

pub fn run() -> truthlens_core::Result<()> {
    println!("TruthLens Doctor: Configuration Diagnostics");
    println!("============================================\n");

    let path = AppConfig::config_path();
    if path.exists() {
        println!("  ✅ Config file: {}", path.display());
    } else {
        println!("  ℹ️  No config file at {}, using defaults", path.display());
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            return Err(e.into());
        }
    };

    let checks = diagnose(&config);
    for check in &checks {
        let icon = match check.status {
            Status::Ok => "✅",
            Status::Warn => "⚠️ ",
        };
        println!("  {icon} {}", check.message);
    }

    let issues = checks.iter().filter(|c| c.status == Status::Warn).count();
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. Queries still answer with degraded results.");
    }

    Ok(())
}

fn diagnose(config: &AppConfig) -> Vec<Check> {
    let flags = config.feature_flags();
    let mut checks = Vec::new();

    if config.news_api_key().is_some() {
        checks.push(Check::ok("News provider key configured"));
    } else {
        checks.push(Check::warn(
            "NEWSAPI_KEY not set; queries will return no sources",
        ));
    }

    checks.push(Check::ok(format!(
        "Real summarization: {} (provider {}, model {})",
        flags.real_summarization, config.summarization.provider, config.summarization.model
    )));

    if flags.real_summarization && config.llm_api_key().is_none() {
        checks.push(Check::warn(
            "ENABLE_REAL_SUMMARIZATION is on but no LLM API key is set; mock summaries will be used",
        ));
    }

    checks.push(Check::ok(format!(
        "Real verification: {} ({} trusted domains)",
        flags.real_verification,
        config.verification.trusted_domains.len()
    )));

    checks.push(Check::ok(format!(
        "Gateway address: {}:{}",
        config.gateway.host, config.gateway.port
    )));

    checks
}
