use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }
        Ok(secs)
    };

    let log_level = or_default("PANTRY_LOG_LEVEL", "info");
    let fetch_timeout_secs = parse_secs("PANTRY_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_connect_timeout_secs = parse_secs("PANTRY_FETCH_CONNECT_TIMEOUT_SECS", "10")?;
    let fetch_user_agent = or_default("PANTRY_FETCH_USER_AGENT", "pantry/0.1 (recipe-import)");

    Ok(AppConfig {
        log_level,
        fetch_timeout_secs,
        fetch_connect_timeout_secs,
        fetch_user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
