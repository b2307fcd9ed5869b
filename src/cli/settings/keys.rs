//! Handlers for each configuration key.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{parse_minutes, single_value, success_set, success_unset};
use crate::cli::settings::SettingHandler;
use crate::core::config::{Config, SessionBackend};
use crate::utils::url::{is_http_url, normalize_base_url};

/// Handler for the `api-base-url` setting.
pub struct ApiBaseUrlHandler;

impl SettingHandler for ApiBaseUrlHandler {
    fn key(&self) -> &'static str {
        "api-base-url"
    }

    fn set(&self, config: &mut Config, args: &[String]) -> Result<String, SettingError> {
        let raw = single_value(
            args,
            "To set the backend URL, include the /api prefix:",
            "thrapy set api-base-url https://thrapy.example/api",
        )?;
        if !is_http_url(raw) {
            return Err(SettingError::InvalidValue {
                key: "api-base-url",
                reason: format!("'{raw}' must start with http:// or https://"),
            });
        }
        let url = normalize_base_url(raw);
        let message = success_set(self.key(), &url);
        config.api_base_url = Some(url);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.api_base_url = None;
        Ok(success_unset(self.key()))
    }
}

/// Handler for the `session-backend` setting.
pub struct SessionBackendHandler;

impl SettingHandler for SessionBackendHandler {
    fn key(&self) -> &'static str {
        "session-backend"
    }

    fn set(&self, config: &mut Config, args: &[String]) -> Result<String, SettingError> {
        let raw = single_value(
            args,
            "To choose where the sign-in is kept, specify file or keyring:",
            "thrapy set session-backend keyring",
        )?;
        let backend: SessionBackend = raw.parse().map_err(|reason| SettingError::InvalidValue {
            key: "session-backend",
            reason,
        })?;
        config.session_backend = Some(backend);
        Ok(success_set(self.key(), backend.as_str()))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        config.session_backend = None;
        Ok(success_unset(self.key()))
    }
}

/// Handler for the two session length settings.
pub struct MinutesHandler {
    key: &'static str,
    example: &'static str,
    field: fn(&mut Config) -> &mut Option<u32>,
}

fn ai_session_minutes(config: &mut Config) -> &mut Option<u32> {
    &mut config.ai_session_minutes
}

fn therapist_session_minutes(config: &mut Config) -> &mut Option<u32> {
    &mut config.therapist_session_minutes
}

pub fn ai_session_minutes_handler() -> MinutesHandler {
    MinutesHandler {
        key: "ai-session-minutes",
        example: "thrapy set ai-session-minutes 30",
        field: ai_session_minutes,
    }
}

pub fn therapist_session_minutes_handler() -> MinutesHandler {
    MinutesHandler {
        key: "therapist-session-minutes",
        example: "thrapy set therapist-session-minutes 50",
        field: therapist_session_minutes,
    }
}

impl SettingHandler for MinutesHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, config: &mut Config, args: &[String]) -> Result<String, SettingError> {
        let raw = single_value(args, "Specify a session length in minutes:", self.example)?;
        let minutes = parse_minutes(self.key, raw)?;
        *(self.field)(config) = Some(minutes);
        Ok(success_set(self.key, &minutes.to_string()))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        *(self.field)(config) = None;
        Ok(success_unset(self.key))
    }
}
