//! Terminal views.
//!
//! Each view reads input through [`prompt`], drives state from
//! [`crate::core`], and prints results with [`render`]. Views never touch
//! persisted state directly; sign-in goes through
//! [`crate::core::auth::AuthController`].

pub mod account;
pub mod chat;
pub mod history;
pub mod home;
pub mod prompt;
pub mod render;
pub mod therapist_setup;
pub mod therapists;
