//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use tubely_core::Config;

/// Validate critical configuration values
///
/// Runs the static checks of [`Config::validate`] and then the ones that depend on the
/// host, such as the scratch directory being present.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    let scratch_dir = config.scratch_dir();
    if !scratch_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "SCRATCH_DIR {} does not exist or is not a directory",
            scratch_dir.display()
        ));
    }

    if config.presigned_url_ttl_secs() == 0 {
        return Err(anyhow::anyhow!("PRESIGNED_URL_TTL_SECS cannot be 0"));
    }

    tracing::info!(
        environment = %config.environment(),
        error_details = !config.is_production(),
        "Configuration validation passed"
    );
    Ok(())
}
