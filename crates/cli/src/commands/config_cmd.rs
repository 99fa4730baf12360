//! `truthlens config`: Print a starter config file.

use truthlens_config::AppConfig;

pub fn run() {
    println!("# Save as {}", AppConfig::config_path().display());
    println!("{}", AppConfig::default_toml());
}
