//! Sign-in state for the whole client.
//!
//! One [`AuthController`] is built at startup and handed to every view that
//! needs it. Its state only changes through its own methods.

use crate::api::{
    ApiError, AuthResponse, Credential, Identity, LoginRequest, RegisterRequest, Role,
    TherapyApi,
};
use crate::core::session_store::{SessionStore, SessionStoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated {
        identity: Identity,
        credential: Credential,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A required field was missing; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend refused, or could not be reached.
    #[error("{0}")]
    Rejected(String),

    #[error("A sign-in request is already in progress")]
    InProgress,

    /// Sign out first; the stored session belongs to another attempt.
    #[error("Already signed in")]
    AlreadySignedIn,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

fn require(value: &str, label: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::Validation(format!("{label} is required")))
    } else {
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    require(email, "Email")?;
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AuthError::Validation(format!(
            "'{trimmed}' is not a valid email address"
        ))),
    }
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        require(&self.full_name, "Full name")?;
        validate_email(&self.email)?;
        require(&self.password, "Password")
    }
}

pub struct AuthController {
    api: Arc<dyn TherapyApi>,
    store: SessionStore,
    state: AuthState,
    /// Why the current sign-in was not written to storage, if it wasn't.
    unsaved: Option<SessionStoreError>,
}

impl AuthController {
    /// Build the controller, restoring any persisted session without
    /// touching the network.
    pub fn new(api: Arc<dyn TherapyApi>, store: SessionStore) -> Self {
        let state = match store.load() {
            Some(stored) => {
                debug!(user_id = %stored.identity.id, "restored persisted session");
                AuthState::Authenticated {
                    identity: stored.identity,
                    credential: stored.credential,
                }
            }
            None => AuthState::Unauthenticated,
        };
        Self {
            api,
            store,
            state,
            unsaved: None,
        }
    }

    pub fn api(&self) -> &Arc<dyn TherapyApi> {
        &self.api
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn current_user(&self) -> Option<&Identity> {
        match &self.state {
            AuthState::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        match &self.state {
            AuthState::Authenticated { credential, .. } => Some(credential),
            _ => None,
        }
    }

    /// Set when the last sign-in only lives in memory for this run.
    pub fn unsaved_reason(&self) -> Option<&SessionStoreError> {
        self.unsaved.as_ref()
    }

    pub fn store_location(&self) -> String {
        self.store.location()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity, AuthError> {
        validate_email(email)?;
        require(password, "Password")?;
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        self.begin()?;
        let result = self.api.login(&request).await;
        self.complete(result, LOGIN_FAILED)
    }

    pub async fn register(&mut self, form: &RegistrationForm) -> Result<Identity, AuthError> {
        form.validate()?;
        let request = RegisterRequest {
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            role: form.role,
        };

        self.begin()?;
        let result = self.api.register(&request).await;
        self.complete(result, REGISTRATION_FAILED)
    }

    /// Forget the signed-in user. Never fails.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear persisted session");
        }
        if let Some(identity) = self.current_user() {
            info!(user_id = %identity.id, "signed out");
        }
        self.state = AuthState::Unauthenticated;
        self.unsaved = None;
    }

    fn begin(&mut self) -> Result<(), AuthError> {
        match self.state {
            AuthState::Authenticating => return Err(AuthError::InProgress),
            AuthState::Authenticated { .. } => return Err(AuthError::AlreadySignedIn),
            AuthState::Unauthenticated => {}
        }
        self.state = AuthState::Authenticating;
        Ok(())
    }

    fn complete(
        &mut self,
        result: Result<AuthResponse, ApiError>,
        fallback: &str,
    ) -> Result<Identity, AuthError> {
        match result {
            Ok(response) => {
                let credential = Credential::new(response.access_token);
                self.unsaved = self.store.save(&response.user, &credential).err();
                if let Some(err) = &self.unsaved {
                    warn!(error = %err, "signed in but could not persist the session");
                }
                info!(user_id = %response.user.id, role = %response.user.role, "signed in");
                self.state = AuthState::Authenticated {
                    identity: response.user.clone(),
                    credential,
                };
                Ok(response.user)
            }
            Err(err) => {
                debug!(error = %err, "authentication request failed");
                self.state = AuthState::Unauthenticated;
                Err(AuthError::Rejected(err.user_message(fallback)))
            }
        }
    }
}
