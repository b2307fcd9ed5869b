use thiserror::Error;

/// Why a `set`/`unset` command could not be applied.
#[derive(Debug, Error)]
pub enum SettingError {
    #[error("Unknown config key: {0}")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("{hint}")]
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    #[error("Failed to save configuration: {0}")]
    Persist(String),
}

impl SettingError {
    /// Report on stderr, with a usage example or pointer where one helps.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(_) => {
                eprintln!("❌ {self}");
                eprintln!("   Run 'thrapy config' to see the available keys.");
            }
            SettingError::MissingArgs { example, .. } => {
                eprintln!("⚠️  {self}");
                eprintln!("Example: {example}");
            }
            SettingError::InvalidValue { .. } | SettingError::Persist(_) => {
                eprintln!("❌ {self}");
            }
        }
    }
}
