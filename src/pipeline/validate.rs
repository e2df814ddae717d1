// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;

/// Validate configuration values and report them.
pub fn run_validate(config: &Config) -> Result<()> {
    config.validate()?;

    log::info!("Configuration OK");
    log::info!("  site.start_url: {}", config.site.start_url);
    log::info!("  crawler.user_agent: {}", config.crawler.user_agent);
    log::info!("  crawler.timeout_secs: {}", config.crawler.timeout_secs);
    log::info!("  crawler.max_concurrent: {}", config.crawler.max_concurrent);
    log::info!("  crawler.max_retries: {}", config.crawler.max_retries);
    log::info!("  staging.dir: {}", config.staging.dir.display());
    log::info!("  database.path: {}", config.database.path.display());

    Ok(())
}
