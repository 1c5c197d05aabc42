use crate::app_config::{AppConfig, MapConfig};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "bitcoinlatte/0.1 (crypto-shop-map)";
const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Load backend configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Load map client configuration from environment variables.
///
/// Every map setting has a default, so this only fails on malformed values.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a numeric setting does not parse.
pub fn load_map_config() -> Result<MapConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_map_config(|key| std::env::var(key))
}

/// Typed accessors over an env-var lookup function, so parsing can be tested
/// with a plain `HashMap` instead of mutating the process environment.
struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    fn require(&self, var: &str) -> Result<String, ConfigError> {
        (self.lookup)(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    }

    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).ok().filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, var: &str, default: &str) -> String {
        (self.lookup)(var).unwrap_or_else(|_| default.to_string())
    }

    fn parse<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.or_default(var, default);
        raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    }
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env = EnvReader { lookup };

    let supabase_url = env.require("SUPABASE_URL")?;
    let supabase_anon_key = env.require("SUPABASE_ANON_KEY")?;

    let bind_addr = env.parse("LATTE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = env.or_default("LATTE_LOG_LEVEL", "info");

    let here_api_key = env.optional("HERE_API_KEY");
    let valueserp_api_key = env.optional("VALUESERP_API_KEY");
    let overpass_url = env.or_default("LATTE_OVERPASS_URL", DEFAULT_OVERPASS_URL);

    let http_timeout_secs = env.parse("LATTE_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = env.or_default("LATTE_USER_AGENT", DEFAULT_USER_AGENT);

    Ok(AppConfig {
        bind_addr,
        log_level,
        supabase_url,
        supabase_anon_key,
        here_api_key,
        valueserp_api_key,
        overpass_url,
        http_timeout_secs,
        user_agent,
    })
}

fn build_map_config<F>(lookup: F) -> Result<MapConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env = EnvReader { lookup };

    Ok(MapConfig {
        api_base_url: env.or_default("LATTE_API_BASE_URL", "http://localhost:3000"),
        local_store_path: env
            .or_default("LATTE_LOCAL_STORE_PATH", "./.latte/local-storage.json")
            .into(),
        debounce_ms: env.parse("LATTE_DEBOUNCE_MS", "500")?,
        http_timeout_secs: env.parse("LATTE_HTTP_TIMEOUT_SECS", "30")?,
        user_agent: env.or_default("LATTE_USER_AGENT", DEFAULT_USER_AGENT),
        log_level: env.or_default("LATTE_LOG_LEVEL", "info"),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
