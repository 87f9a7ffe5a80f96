//! Server configuration.
//!
//! Built once from the environment at startup and passed down through
//! [`crate::AppState`]; nothing here is a process-wide mutable singleton.

use rope_occurrence_models::DescriptionPolicy;

/// Runtime configuration for the RO-PE server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// Port to bind the HTTP listener to.
    pub port: u16,
    /// CORS origin allow-list. Empty means permissive (dev default).
    pub allowed_origins: Vec<String>,
    /// Directory the static frontend is served from.
    pub static_dir: String,
    /// Description length bounds for new occurrences.
    pub description_policy: DescriptionPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origins: Vec::new(),
            static_dir: "frontend".to_string(),
            description_policy: DescriptionPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    ///
    /// Recognized variables: `BIND_ADDR`, `PORT`, `CORS_ORIGINS`
    /// (comma-separated), `STATIC_DIR`, `DESCRIPTION_MIN`,
    /// `DESCRIPTION_MAX`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let allowed_origins = std::env::var("CORS_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_default();
        let static_dir = std::env::var("STATIC_DIR").unwrap_or(defaults.static_dir);

        let min_chars = std::env::var("DESCRIPTION_MIN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.description_policy.min_chars);
        let max_chars = std::env::var("DESCRIPTION_MAX")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.description_policy.max_chars);

        Self {
            bind_addr,
            port,
            allowed_origins,
            static_dir,
            description_policy: DescriptionPolicy {
                min_chars,
                max_chars,
            },
        }
    }
}

/// Splits a comma-separated origin list, dropping empty entries.
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
