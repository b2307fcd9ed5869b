use super::keys::{
    ai_session_minutes_handler, therapist_session_minutes_handler, ApiBaseUrlHandler,
    SessionBackendHandler,
};
use super::{SettingError, SettingHandler};
use crate::core::config::Config;

/// The keys accepted by `thrapy set` and `thrapy unset`, in help order.
pub struct SettingRegistry {
    handlers: Vec<Box<dyn SettingHandler>>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![
                Box::new(ApiBaseUrlHandler),
                Box::new(SessionBackendHandler),
                Box::new(ai_session_minutes_handler()),
                Box::new(therapist_session_minutes_handler()),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.key() == key)
            .map(|handler| handler.as_ref())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.key()).collect()
    }

    pub fn set(
        &self,
        config: &mut Config,
        key: &str,
        args: &[String],
    ) -> Result<String, SettingError> {
        self.lookup(key)?.set(config, args)
    }

    pub fn unset(&self, config: &mut Config, key: &str) -> Result<String, SettingError> {
        self.lookup(key)?.unset(config)
    }

    fn lookup(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        self.get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
