pub mod data;
pub mod defaults;
pub mod io;
pub mod printing;

#[cfg(test)]
mod tests;

pub use data::{Config, SessionBackend};
pub use io::ConfigError;
