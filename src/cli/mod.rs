//! Command-line interface parsing and handling
//!
//! This module parses arguments, builds the single [`AuthController`] for the
//! process and dispatches into the views in [`crate::ui`].

pub mod settings;

#[cfg(test)]
mod tests;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::api::{ApiClient, Role, TherapyApi};
use crate::cli::settings::helpers::mutate_config;
use crate::cli::settings::SettingRegistry;
use crate::core::auth::AuthController;
use crate::core::config::data::path_display;
use crate::core::config::io::project_dirs;
use crate::core::config::{Config, ConfigError, SessionBackend};
use crate::core::guard::{guard, GuardDecision, Route};
use crate::core::kv::{FileBackend, KeyringBackend, KvBackend};
use crate::core::session_store::SessionStore;
use crate::ui::account::{
    login_view, logout_view, register_view, whoami_view, LoginInput, RegisterInput,
};
use crate::ui::chat::{run_chat, ChatOptions};
use crate::ui::history::{show_payments, show_sessions};
use crate::ui::home::show_home;
use crate::ui::therapist_setup::{register_profile, set_availability, ProfileInput};
use crate::ui::therapists::run_therapists;

pub const KEYRING_SERVICE: &str = "thrapy";
pub const SESSION_FILE: &str = "session.json";

#[derive(Parser, Debug)]
#[command(name = "thrapy", version)]
#[command(about = "Book AI and licensed-therapist sessions from your terminal")]
#[command(
    long_about = "Thrapy is a terminal client for the Thrapy therapy-booking service. \
Talk to an AI companion, browse licensed therapists and book sessions, and review \
your session and payment history.\n\n\
Getting started:\n\
  thrapy register     Create an account\n\
  thrapy login        Sign in (the session is remembered between runs)\n\
  thrapy chat         Start an AI therapy session\n\
  thrapy therapists   Browse and book therapists\n\n\
Configuration:\n\
  thrapy config                      Show current settings\n\
  thrapy set api-base-url <URL>      Point at another backend\n\
  thrapy set session-backend keyring Keep your sign-in in the system keyring\n\n\
Environment Variables:\n\
  THRAPY_API_URL    Backend base URL, including the /api prefix\n\
  RUST_LOG          Log filter for diagnostics written to stderr"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL for this run (overrides config and THRAPY_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the landing page (default)
    Home,
    /// Sign in to your account
    Login {
        #[arg(short, long)]
        email: Option<String>,
        /// Password (prompted for when omitted)
        #[arg(long, env = "THRAPY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create a new account
    Register {
        /// Your full name
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(long, env = "THRAPY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Account type: client or therapist
        #[arg(short, long)]
        role: Option<Role>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Start (or resume) an AI therapy session
    Chat {
        /// Resume an existing session by id
        #[arg(short, long, value_name = "ID")]
        session: Option<String>,
        /// Log the conversation to a file
        #[arg(short, long, value_name = "FILE")]
        log: Option<PathBuf>,
        /// Session length in minutes
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        minutes: Option<u32>,
        /// Don't ask before starting a paid session
        #[arg(short, long)]
        yes: bool,
    },
    /// Browse licensed therapists and book a session
    Therapists {
        /// Book the therapist with this id or list number
        #[arg(short, long, value_name = "ID|#")]
        book: Option<String>,
        /// Session length in minutes
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        minutes: Option<u32>,
        /// Don't ask before booking
        #[arg(short, long)]
        yes: bool,
    },
    /// List your sessions
    Sessions,
    /// List your payments
    Payments,
    /// Publish your therapist profile (therapist accounts)
    TherapistProfile {
        #[arg(long)]
        license: Option<String>,
        #[arg(long)]
        specialization: Option<String>,
        /// Hourly rate in USD
        #[arg(long)]
        rate: Option<f64>,
        /// Years of experience
        #[arg(long)]
        years: Option<u32>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Set your weekly availability (therapist accounts)
    Availability {
        /// Slots such as "mon 09:00-17:00"
        #[arg(required = true)]
        slots: Vec<String>,
    },
    /// Check that the backend is reachable
    Health,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
}

impl Commands {
    /// The view this command opens, for sign-in checks.
    pub fn route(&self) -> Route {
        match self {
            Commands::Login { .. } => Route::Login,
            Commands::Register { .. } => Route::Register,
            Commands::Chat { .. } => Route::AiTherapy,
            Commands::Therapists { .. } => Route::Therapists,
            Commands::Sessions => Route::Sessions,
            Commands::Payments => Route::Payments,
            Commands::TherapistProfile { .. } => Route::TherapistProfile,
            Commands::Availability { .. } => Route::Availability,
            Commands::Home
            | Commands::Logout
            | Commands::Whoami
            | Commands::Health
            | Commands::Set { .. }
            | Commands::Unset { .. }
            | Commands::Config => Route::Home,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("thrapy=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.unwrap_or(Commands::Home) {
        Commands::Set { key, value } => {
            if value.is_empty() {
                Config::load()?.print_all();
                return Ok(());
            }
            let registry = SettingRegistry::new();
            match mutate_config(|config| registry.set(config, &key, &value)) {
                Ok(message) => println!("{message}"),
                Err(e) => {
                    e.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let registry = SettingRegistry::new();
            match mutate_config(|config| registry.unset(config, &key)) {
                Ok(message) => println!("{message}"),
                Err(e) => {
                    e.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Config => {
            Config::load()?.print_all();
            println!();
            println!("Config file: {}", path_display(Config::get_config_path()?));
            Ok(())
        }
        command => {
            let config = Config::load()?;
            let base_url = match args.api_url.as_deref() {
                Some(url) => config.resolve_api_base_url(Some(url)),
                None => config.api_base_url_from_env(),
            };
            debug!(%base_url, backend = %config.session_backend(), "starting");

            let api: Arc<dyn TherapyApi> = Arc::new(ApiClient::new(&base_url));
            let store = SessionStore::new(session_backend(&config)?);
            let mut auth = AuthController::new(api, store);

            if let Err(e) = dispatch(&mut auth, &config, &base_url, command).await {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

pub fn session_backend(config: &Config) -> Result<Box<dyn KvBackend>, ConfigError> {
    match config.session_backend() {
        SessionBackend::File => {
            let dirs = project_dirs()?;
            Ok(Box::new(FileBackend::new(dirs.data_dir().join(SESSION_FILE))))
        }
        SessionBackend::Keyring => Ok(Box::new(KeyringBackend::new(KEYRING_SERVICE))),
    }
}

/// Apply the sign-in check for `route`, offering to sign in when needed.
async fn ensure_access(auth: &mut AuthController, route: Route) -> Result<(), Box<dyn Error>> {
    match guard(auth.state(), route) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Loading => Err("Sign-in is still in progress".into()),
        GuardDecision::Redirect(Route::Login) => {
            println!("🔐 {route} requires signing in.");
            login_view(auth, LoginInput::default()).await?;
            match guard(auth.state(), route) {
                GuardDecision::Allow => Ok(()),
                _ => Err(format!("Sign in to open {route}").into()),
            }
        }
        GuardDecision::Redirect(other) => Err(format!("Open {other} first").into()),
    }
}

async fn dispatch(
    auth: &mut AuthController,
    config: &Config,
    base_url: &str,
    command: Commands,
) -> Result<(), Box<dyn Error>> {
    ensure_access(auth, command.route()).await?;

    match command {
        Commands::Home => show_home(auth),
        Commands::Login { email, password } => {
            login_view(auth, LoginInput { email, password }).await?
        }
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            register_view(
                auth,
                RegisterInput {
                    full_name: name,
                    email,
                    password,
                    role,
                },
            )
            .await?
        }
        Commands::Logout => logout_view(auth),
        Commands::Whoami => whoami_view(auth),
        Commands::Chat {
            session,
            log,
            minutes,
            yes,
        } => {
            let options = ChatOptions {
                resume: session,
                log_file: log,
                minutes: minutes.unwrap_or_else(|| config.ai_session_minutes()),
                assume_yes: yes,
            };
            run_chat(auth, options).await?
        }
        Commands::Therapists { book, minutes, yes } => {
            let minutes = minutes.unwrap_or_else(|| config.therapist_session_minutes());
            run_therapists(auth, book, minutes, yes).await?
        }
        Commands::Sessions => show_sessions(auth).await?,
        Commands::Payments => show_payments(auth).await?,
        Commands::TherapistProfile {
            license,
            specialization,
            rate,
            years,
            bio,
        } => {
            let input = ProfileInput {
                license_number: license,
                specialization,
                hourly_rate: rate,
                years_experience: years,
                bio,
            };
            register_profile(auth, input).await?
        }
        Commands::Availability { slots } => set_availability(auth, slots).await?,
        Commands::Health => {
            let health = auth.api().health().await?;
            println!("✅ {base_url}: {}", health.status);
        }
        Commands::Set { .. } | Commands::Unset { .. } | Commands::Config => {
            return Err("configuration commands run without a session".into());
        }
    }
    Ok(())
}
