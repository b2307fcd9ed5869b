use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the signed-in session is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// A JSON file in the platform data directory.
    #[default]
    File,
    /// The operating system keyring.
    Keyring,
}

impl SessionBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionBackend::File => "file",
            SessionBackend::Keyring => "keyring",
        }
    }
}

impl fmt::Display for SessionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(SessionBackend::File),
            "keyring" => Ok(SessionBackend::Keyring),
            other => Err(format!(
                "Unknown session backend '{other}'. Expected 'file' or 'keyring'"
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the backend API, including the `/api` prefix
    pub api_base_url: Option<String>,
    pub session_backend: Option<SessionBackend>,
    /// Length of newly started AI sessions, in minutes
    pub ai_session_minutes: Option<u32>,
    /// Length of newly booked therapist sessions, in minutes
    pub therapist_session_minutes: Option<u32>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/thrapy/config.toml` → `~/.config/thrapy/config.toml`
/// - macOS: `/Users/user/Library/Application Support/...` → `~/Library/Application Support/...`
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
