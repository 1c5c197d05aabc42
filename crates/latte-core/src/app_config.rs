use std::net::SocketAddr;
use std::path::PathBuf;

/// Backend configuration: bind address, upstream credentials and endpoints.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub here_api_key: Option<String>,
    pub valueserp_api_key: Option<String>,
    pub overpass_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &"[redacted]")
            .field(
                "here_api_key",
                &self.here_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "valueserp_api_key",
                &self.valueserp_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("overpass_url", &self.overpass_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Map client configuration: where the backend lives and where layer
/// preferences are stored.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub api_base_url: String,
    pub local_store_path: PathBuf,
    pub debounce_ms: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}
