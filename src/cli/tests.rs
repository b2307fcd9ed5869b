use super::*;
use crate::api::Credential;
use crate::core::kv::MemoryBackend;
use crate::core::session_store::{TOKEN_KEY, USER_KEY};
use crate::utils::test_utils::{sample_identity, FakeApi};

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn signed_in_controller(api: Arc<FakeApi>) -> AuthController {
        let user_json = serde_json::to_string(&sample_identity()).expect("encode identity");
        let backend =
            MemoryBackend::with_entries(&[(TOKEN_KEY, "t1"), (USER_KEY, user_json.as_str())]);
        AuthController::new(api, SessionStore::new(Box::new(backend)))
    }
}

use test_helpers::*;

#[test]
fn no_subcommand_opens_home() {
    let args = parse_args(&["thrapy"]);
    assert!(args.command.is_none());
    assert!(!args.verbose);
}

#[test]
fn verbose_and_api_url_are_global() {
    let args = parse_args(&["thrapy", "sessions", "-v", "--api-url", "http://x/api"]);
    assert!(args.verbose);
    assert_eq!(args.api_url.as_deref(), Some("http://x/api"));
    assert!(matches!(args.command, Some(Commands::Sessions)));
}

#[test]
fn chat_flags_parse() {
    let argv = ["thrapy", "chat", "-s", "abc", "--log", "chat.md", "-m", "30", "-y"];
    match parse_args(&argv).command {
        Some(Commands::Chat {
            session,
            log,
            minutes,
            yes,
        }) => {
            assert_eq!(session.as_deref(), Some("abc"));
            assert_eq!(log, Some(PathBuf::from("chat.md")));
            assert_eq!(minutes, Some(30));
            assert!(yes);
        }
        other => panic!("unexpected command for argv={argv:?}: {other:?}"),
    }
}

#[test]
fn zero_minute_sessions_are_rejected() {
    for argv in [
        &["thrapy", "chat", "--minutes", "0"][..],
        &["thrapy", "therapists", "-b", "1", "-m", "0"][..],
    ] {
        let err = Args::try_parse_from(argv).expect_err("zero minutes");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "argv={argv:?}");
    }
    match parse_args(&["thrapy", "therapists", "-m", "1"]).command {
        Some(Commands::Therapists { minutes, .. }) => assert_eq!(minutes, Some(1)),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn register_role_parses_case_insensitively() {
    let argv = ["thrapy", "register", "-n", "A", "-e", "a@b.com", "--role", "Therapist"];
    match parse_args(&argv).command {
        Some(Commands::Register { name, role, .. }) => {
            assert_eq!(name.as_deref(), Some("A"));
            assert_eq!(role, Some(Role::Therapist));
        }
        other => panic!("unexpected command for argv={argv:?}: {other:?}"),
    }

    assert!(Args::try_parse_from(["thrapy", "register", "--role", "wizard"]).is_err());
}

#[test]
fn set_collects_the_remaining_words() {
    match parse_args(&["thrapy", "set", "api-base-url", "https://x/api"]).command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key, "api-base-url");
            assert_eq!(value, ["https://x/api"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
    match parse_args(&["thrapy", "set", "api-base-url"]).command {
        Some(Commands::Set { value, .. }) => assert!(value.is_empty()),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn availability_requires_a_slot() {
    assert!(Args::try_parse_from(["thrapy", "availability"]).is_err());
    match parse_args(&["thrapy", "availability", "mon 09:00-12:00", "fri 13:00-17:00"]).command {
        Some(Commands::Availability { slots }) => assert_eq!(slots.len(), 2),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn commands_map_to_guarded_routes() {
    let cases = [
        (&["thrapy", "chat"][..], Route::AiTherapy),
        (&["thrapy", "therapists"][..], Route::Therapists),
        (&["thrapy", "sessions"][..], Route::Sessions),
        (&["thrapy", "payments"][..], Route::Payments),
        (&["thrapy", "therapist-profile"][..], Route::TherapistProfile),
        (&["thrapy", "availability", "mon 09:00-10:00"][..], Route::Availability),
        (&["thrapy", "login"][..], Route::Login),
        (&["thrapy", "register"][..], Route::Register),
        (&["thrapy", "health"][..], Route::Home),
        (&["thrapy", "logout"][..], Route::Home),
    ];
    for (argv, expected) in cases {
        let command = parse_args(argv).command.expect("subcommand");
        assert_eq!(command.route(), expected, "argv={argv:?}");
    }
}

#[test]
fn keyring_backend_is_selected_from_config() {
    let config = Config {
        session_backend: Some(SessionBackend::Keyring),
        ..Config::default()
    };
    let backend = session_backend(&config).expect("keyring backend builds");
    assert!(backend.describe().contains("keyring"));
}

#[tokio::test]
async fn signed_in_user_can_open_protected_views() {
    let api = Arc::new(FakeApi::default());
    let mut auth = signed_in_controller(api.clone());

    dispatch(&mut auth, &Config::default(), "http://x/api", Commands::Sessions)
        .await
        .expect("sessions view runs");
    dispatch(&mut auth, &Config::default(), "http://x/api", Commands::Payments)
        .await
        .expect("payments view runs");

    assert_eq!(api.call_count(), 2);
    assert_eq!(api.last_credential().as_deref(), Some("t1"));
}

#[tokio::test]
async fn logout_command_clears_the_session() {
    let api = Arc::new(FakeApi::default());
    let mut auth = signed_in_controller(api.clone());
    assert_eq!(auth.credential(), Some(&Credential::new("t1")));

    dispatch(&mut auth, &Config::default(), "http://x/api", Commands::Logout)
        .await
        .expect("logout runs");

    assert!(!auth.is_authenticated());
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn health_needs_no_sign_in() {
    let api = Arc::new(FakeApi::default());
    let mut auth = AuthController::new(
        api.clone(),
        SessionStore::new(Box::new(MemoryBackend::new())),
    );

    dispatch(&mut auth, &Config::default(), "http://x/api", Commands::Health)
        .await
        .expect("health runs");
    assert_eq!(api.call_count(), 1);
}
