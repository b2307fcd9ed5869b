//! Thrapy is a terminal client for a therapy-booking backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the backend payloads and the reqwest-based
//!   [`api::ApiClient`], behind the [`api::TherapyApi`] trait.
//! - [`core`] owns client state: the persisted session, the
//!   [`core::auth::AuthController`], the route guard, and the state behind the
//!   chat and therapist views.
//! - [`ui`] prompts for input and prints results for each view.
//! - [`cli`] parses arguments, builds the controller once, and dispatches.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
