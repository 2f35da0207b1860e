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

/// Process-wide settings, read once at startup and handed to the clients
/// that need them.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Kakao Local REST key. Region geocoding is unavailable without it.
    pub kakao_api_key: Option<String>,
    pub geocoder_base_url: String,
    pub upstream_base_url: String,
    pub upstream_page_size: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub default_radius_km: f64,
    pub default_tolerance_minutes: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "kakao_api_key",
                &self.kakao_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("upstream_base_url", &self.upstream_base_url)
            .field("upstream_page_size", &self.upstream_page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("default_radius_km", &self.default_radius_km)
            .field(
                "default_tolerance_minutes",
                &self.default_tolerance_minutes,
            )
            .finish()
    }
}
