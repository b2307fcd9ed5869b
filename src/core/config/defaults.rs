use crate::core::config::data::{Config, SessionBackend};
use crate::utils::url::normalize_base_url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001/api";
pub const API_URL_ENV: &str = "THRAPY_API_URL";
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

impl Config {
    /// Resolve the backend URL: environment override, then config, then default.
    pub fn resolve_api_base_url(&self, env_override: Option<&str>) -> String {
        let chosen = env_override
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .or_else(|| {
                self.api_base_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
            })
            .unwrap_or(DEFAULT_API_BASE_URL);
        normalize_base_url(chosen)
    }

    pub fn api_base_url_from_env(&self) -> String {
        let env_value = std::env::var(API_URL_ENV).ok();
        self.resolve_api_base_url(env_value.as_deref())
    }

    pub fn session_backend(&self) -> SessionBackend {
        self.session_backend.unwrap_or_default()
    }

    pub fn ai_session_minutes(&self) -> u32 {
        self.ai_session_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_SESSION_MINUTES)
    }

    pub fn therapist_session_minutes(&self) -> u32 {
        self.therapist_session_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_SESSION_MINUTES)
    }
}
