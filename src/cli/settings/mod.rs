//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`]. Handlers edit a
//! [`Config`] in memory; [`helpers::mutate_config`] wraps them so the file is
//! only rewritten when the edit succeeds.

pub mod error;
pub mod helpers;
pub mod keys;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::Config;

pub trait SettingHandler: Send + Sync {
    /// The configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Apply `args` (everything after the key) and return a success message.
    fn set(&self, config: &mut Config, args: &[String]) -> Result<String, SettingError>;

    fn unset(&self, config: &mut Config) -> Result<String, SettingError>;
}
