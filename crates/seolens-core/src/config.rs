use crate::app_config::{
    ApiSettings, AppConfig, DataForSeoCredentials, Environment, GeminiSettings, GoogleAdsCredentials,
    ProviderSettings,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let env = parse_environment(&or_default("SEOLENS_ENV", "development"))?;
    let bind_addr = or_default("SEOLENS_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SEOLENS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("SEOLENS_LOG_LEVEL", "info");

    let temperature = or_default("GEMINI_TEMPERATURE", "0.3")
        .parse::<f32>()
        .map_err(|e| invalid("GEMINI_TEMPERATURE", e.to_string()))?;
    if !(0.0..=2.0).contains(&temperature) {
        return Err(invalid(
            "GEMINI_TEMPERATURE",
            format!("must be between 0 and 2, got {temperature}"),
        ));
    }
    let gemini = GeminiSettings {
        api_key: require("GEMINI_API_KEY")?,
        model: or_default("GEMINI_MODEL", "gemini-2.5-flash-lite"),
        temperature,
    };

    let dataforseo = match (optional("DATAFORSEO_LOGIN"), optional("DATAFORSEO_PASSWORD")) {
        (Some(login), Some(password)) => Some(DataForSeoCredentials { login, password }),
        _ => None,
    };

    let google_ads = match (
        optional("GOOGLE_ADS_DEVELOPER_TOKEN"),
        optional("GOOGLE_ADS_CLIENT_ID"),
        optional("GOOGLE_ADS_CLIENT_SECRET"),
        optional("GOOGLE_ADS_REFRESH_TOKEN"),
        optional("GOOGLE_ADS_CUSTOMER_ID"),
    ) {
        (
            Some(developer_token),
            Some(client_id),
            Some(client_secret),
            Some(refresh_token),
            Some(customer_id),
        ) => Some(GoogleAdsCredentials {
            developer_token,
            client_id,
            client_secret,
            refresh_token,
            // The REST API wants the bare digits; the UI shows 123-456-7890.
            customer_id: customer_id.replace('-', ""),
        }),
        _ => None,
    };

    let providers = ProviderSettings {
        dataforseo,
        google_ads,
        serpapi_key: optional("SERPAPI_KEY"),
        valueserp_key: optional("VALUESERP_API_KEY"),
        public_autocomplete: parse_bool("SEOLENS_PUBLIC_AUTOCOMPLETE", "true")?,
        http_timeout_secs: parse_u64("SEOLENS_HTTP_TIMEOUT_SECS", "30")?,
        user_agent: or_default("SEOLENS_USER_AGENT", "seolens/0.1 (keyword-research)"),
        max_retries: parse_u32("SEOLENS_PROVIDER_MAX_RETRIES", "2")?,
        retry_backoff_ms: parse_u64("SEOLENS_PROVIDER_RETRY_BACKOFF_MS", "500")?,
        cache_ttl_secs: parse_u64("SEOLENS_CACHE_TTL_SECS", "1800")?,
    };

    let rate_limit_requests = parse_u32("SEOLENS_RATE_LIMIT_REQUESTS", "120")?;
    if rate_limit_requests == 0 {
        return Err(invalid(
            "SEOLENS_RATE_LIMIT_REQUESTS",
            "must be at least 1".to_string(),
        ));
    }
    let rate_limit_window_secs = parse_u64("SEOLENS_RATE_LIMIT_WINDOW_SECS", "60")?;
    if rate_limit_window_secs == 0 {
        return Err(invalid(
            "SEOLENS_RATE_LIMIT_WINDOW_SECS",
            "must be at least 1".to_string(),
        ));
    }
    let api = ApiSettings {
        api_keys: parse_key_list(&or_default("SEOLENS_API_KEYS", "")),
        rate_limit_requests,
        rate_limit_window_secs,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        gemini,
        providers,
        api,
    })
}

/// Splits a comma-separated token list, dropping blanks and repeats.
fn parse_key_list(raw: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in raw.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        if !keys.iter().any(|seen| seen == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SEOLENS_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}
