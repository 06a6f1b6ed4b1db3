use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DataForSeoCredentials {
    pub login: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GoogleAdsCredentials {
    pub developer_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub customer_id: String,
}

/// Model endpoint settings.
#[derive(Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

/// Which external providers are reachable and how to talk to them.
///
/// Presence of a credential gates the matching fallback tier; nothing here is
/// required for the pipeline to produce output.
#[derive(Clone)]
pub struct ProviderSettings {
    pub dataforseo: Option<DataForSeoCredentials>,
    pub google_ads: Option<GoogleAdsCredentials>,
    pub serpapi_key: Option<String>,
    pub valueserp_key: Option<String>,
    pub public_autocomplete: bool,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub cache_ttl_secs: u64,
}

impl ProviderSettings {
    #[must_use]
    pub fn has_serp_provider(&self) -> bool {
        self.serpapi_key.is_some() || self.valueserp_key.is_some()
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            dataforseo: None,
            google_ads: None,
            serpapi_key: None,
            valueserp_key: None,
            public_autocomplete: true,
            http_timeout_secs: 30,
            user_agent: "seolens/0.1 (keyword-research)".to_string(),
            max_retries: 2,
            retry_backoff_ms: 500,
            cache_ttl_secs: 1800,
        }
    }
}

/// Access control for the HTTP surface.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Accepted bearer tokens. Empty disables auth, which is only allowed in
    /// development.
    pub api_keys: Vec<String>,
    /// Requests admitted per window across all protected routes.
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            rate_limit_requests: 120,
            rate_limit_window_secs: 60,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub gemini: GeminiSettings,
    pub providers: ProviderSettings,
    pub api: ApiSettings,
}

fn redact<T>(value: Option<&T>) -> Option<&'static str> {
    value.map(|_| "[redacted]")
}

impl std::fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl std::fmt::Debug for DataForSeoCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataForSeoCredentials")
            .field("login", &self.login)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for GoogleAdsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAdsCredentials")
            .field("developer_token", &"[redacted]")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("customer_id", &self.customer_id)
            .finish()
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("dataforseo", &self.dataforseo)
            .field("google_ads", &self.google_ads)
            .field("serpapi_key", &redact(self.serpapi_key.as_ref()))
            .field("valueserp_key", &redact(self.valueserp_key.as_ref()))
            .field("public_autocomplete", &self.public_autocomplete)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .field("rate_limit_requests", &self.rate_limit_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("gemini", &self.gemini)
            .field("providers", &self.providers)
            .field("api", &self.api)
            .finish()
    }
}
