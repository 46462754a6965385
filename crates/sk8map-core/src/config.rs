use crate::app_config::{AppConfig, Environment, DEFAULT_SEARCH_RADIUS_MILES};
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
/// Every variable has a default, so an empty environment yields a usable config.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a looked-up value is invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_miles = |var: &str, default: f64| -> Result<f64, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(default);
        };
        let miles = raw
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !miles.is_finite() || miles <= 0.0 {
            return Err(invalid(var, format!("radius must be positive, got {raw}")));
        }
        Ok(miles)
    };

    let env = parse_environment(&or_default("SK8MAP_ENV", "development"))?;
    let log_level = or_default("SK8MAP_LOG_LEVEL", "info");
    let overpass_url = or_default(
        "SK8MAP_OVERPASS_URL",
        "https://overpass-api.de/api/interpreter",
    );
    let request_timeout_secs = parse_u64("SK8MAP_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SK8MAP_USER_AGENT", "sk8map/0.1 (skatepark-finder)");
    let search_radius_miles =
        parse_miles("SK8MAP_SEARCH_RADIUS_MILES", DEFAULT_SEARCH_RADIUS_MILES)?;
    let location_timeout_secs = parse_u64("SK8MAP_LOCATION_TIMEOUT_SECS", "10")?;

    if location_timeout_secs == 0 {
        return Err(invalid(
            "SK8MAP_LOCATION_TIMEOUT_SECS",
            "timeout must be at least one second".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        overpass_url,
        request_timeout_secs,
        user_agent,
        search_radius_miles,
        location_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SK8MAP_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
