use crate::api::Role;
use crate::core::auth::{AuthController, AuthState};

/// Landing text, branching on whether someone is signed in.
pub fn home_lines(state: &AuthState) -> Vec<String> {
    let mut lines = vec![
        "🌿 Thrapy: therapy on your terms".to_string(),
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".to_string(),
        "Talk to an AI companion any time, or book a session with a licensed therapist."
            .to_string(),
        String::new(),
    ];

    match state {
        AuthState::Authenticated { identity, .. } => {
            lines.push(format!("Welcome back, {}!", identity.full_name));
            lines.push(String::new());
            lines.push("  thrapy chat          Start an AI therapy session".to_string());
            lines.push("  thrapy therapists    Browse and book licensed therapists".to_string());
            lines.push("  thrapy sessions      Your past sessions".to_string());
            lines.push("  thrapy payments      Your payment history".to_string());
            if identity.role == Role::Therapist {
                lines.push(
                    "  thrapy therapist-profile   Publish your therapist profile".to_string(),
                );
                lines.push("  thrapy availability        Set your weekly hours".to_string());
            }
            lines.push("  thrapy logout        Sign out".to_string());
        }
        AuthState::Authenticating => lines.push("⏳ Signing in...".to_string()),
        AuthState::Unauthenticated => {
            lines.push("Get started:".to_string());
            lines.push("  thrapy register      Create an account".to_string());
            lines.push("  thrapy login         Sign in".to_string());
        }
    }
    lines
}

pub fn show_home(auth: &AuthController) {
    for line in home_lines(auth.state()) {
        println!("{line}");
    }
}
