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
/// Unlike [`load_app_config`], this does NOT load `.env` files, which is useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the real environment, so
/// tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_km = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(var, format!("must be a non-negative number, got {value}")));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("FUTSAL_ENV", "development"))?;
    let bind_addr = parse_addr("FUTSAL_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("FUTSAL_LOG_LEVEL", "info");

    let kakao_api_key = lookup("KAKAO_REST_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    let geocoder_base_url = or_default("FUTSAL_GEOCODER_BASE_URL", "https://dapi.kakao.com");
    let upstream_base_url = or_default("FUTSAL_UPSTREAM_BASE_URL", "https://www.iamground.kr");

    let upstream_page_size = parse_u32("FUTSAL_UPSTREAM_PAGE_SIZE", "50")?;
    if upstream_page_size == 0 {
        return Err(invalid(
            "FUTSAL_UPSTREAM_PAGE_SIZE",
            "must be greater than zero".to_string(),
        ));
    }
    let request_timeout_secs = parse_u64("FUTSAL_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("FUTSAL_USER_AGENT", "futsal-finder/0.1");

    let default_radius_km = parse_km("FUTSAL_DEFAULT_RADIUS_KM", "5")?;
    let default_tolerance_minutes = parse_u32("FUTSAL_DEFAULT_TOLERANCE_MINUTES", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        kakao_api_key,
        geocoder_base_url,
        upstream_base_url,
        upstream_page_size,
        request_timeout_secs,
        user_agent,
        default_radius_km,
        default_tolerance_minutes,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FUTSAL_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
