pub mod auth;
pub mod chat;
pub mod config;
pub mod directory;
pub mod gate;
pub mod guard;
pub mod keyring;
pub mod kv;
pub mod message;
pub mod session_store;
