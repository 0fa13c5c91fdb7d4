use crate::app_config::{AppConfig, Environment};
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
/// Every variable has a default, so an empty environment yields a usable
/// development configuration pointed at a local API.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let env = parse_environment(&or_default("BREWLINE_ENV", "development"))?;

    let api_base_url = or_default("BREWLINE_API_BASE_URL", "http://localhost:8080/api/v1");
    if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
        return Err(invalid(
            "BREWLINE_API_BASE_URL",
            format!("\"{api_base_url}\" is not an http(s) URL"),
        ));
    }

    let api_timeout_secs = parse_u64("BREWLINE_API_TIMEOUT_SECS", "10")?;
    if api_timeout_secs == 0 {
        return Err(invalid(
            "BREWLINE_API_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let user_agent = or_default("BREWLINE_USER_AGENT", "brewline/0.1 (storefront)");
    let state_path = PathBuf::from(or_default("BREWLINE_STATE_PATH", "./.brewline/state.json"));
    let log_level = or_default("BREWLINE_LOG_LEVEL", "info");
    let offline_fallback = parse_bool("BREWLINE_OFFLINE_FALLBACK", "true")?;
    let send_trace_headers = parse_bool("BREWLINE_SEND_TRACE_HEADERS", "true")?;

    let default_latitude = parse_f64("BREWLINE_DEFAULT_LATITUDE", "39.9042")?;
    if !(-90.0..=90.0).contains(&default_latitude) {
        return Err(invalid(
            "BREWLINE_DEFAULT_LATITUDE",
            "must be within [-90, 90]".to_string(),
        ));
    }
    let default_longitude = parse_f64("BREWLINE_DEFAULT_LONGITUDE", "116.4074")?;
    if !(-180.0..=180.0).contains(&default_longitude) {
        return Err(invalid(
            "BREWLINE_DEFAULT_LONGITUDE",
            "must be within [-180, 180]".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        api_base_url,
        api_timeout_secs,
        user_agent,
        state_path,
        log_level,
        offline_fallback,
        send_trace_headers,
        default_latitude,
        default_longitude,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BREWLINE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
