//! Which views a user may open.

use crate::core::auth::AuthState;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    AiTherapy,
    Therapists,
    Sessions,
    Payments,
    TherapistProfile,
    Availability,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::AiTherapy,
        Route::Therapists,
        Route::Sessions,
        Route::Payments,
        Route::TherapistProfile,
        Route::Availability,
    ];

    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Home | Route::Login | Route::Register)
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Sign in",
            Route::Register => "Create account",
            Route::AiTherapy => "AI therapy",
            Route::Therapists => "Therapists",
            Route::Sessions => "Sessions",
            Route::Payments => "Payments",
            Route::TherapistProfile => "Therapist profile",
            Route::Availability => "Availability",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Sign-in is still being resolved.
    Loading,
    Allow,
    Redirect(Route),
}

pub fn guard(state: &AuthState, route: Route) -> GuardDecision {
    match state {
        AuthState::Authenticating => GuardDecision::Loading,
        AuthState::Authenticated { .. } => GuardDecision::Allow,
        AuthState::Unauthenticated if route.is_protected() => {
            GuardDecision::Redirect(Route::Login)
        }
        AuthState::Unauthenticated => GuardDecision::Allow,
    }
}
