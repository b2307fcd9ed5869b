//! Sign-in, registration and sign-out views.

use crate::api::Role;
use crate::core::auth::{AuthController, AuthError, RegistrationForm};
use crate::ui::prompt::{password_or_prompt, role_or_prompt, text_or_prompt, UiError};

#[derive(Debug, Default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default)]
pub struct RegisterInput {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug)]
pub enum AccountError {
    Input(UiError),
    Auth(AuthError),
}

impl std::fmt::Display for AccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountError::Input(err) => write!(f, "{err}"),
            AccountError::Auth(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AccountError {}

impl From<UiError> for AccountError {
    fn from(err: UiError) -> Self {
        AccountError::Input(err)
    }
}

impl From<AuthError> for AccountError {
    fn from(err: AuthError) -> Self {
        AccountError::Auth(err)
    }
}

pub async fn login_view(auth: &mut AuthController, input: LoginInput) -> Result<(), AccountError> {
    if let Some(identity) = auth.current_user() {
        println!(
            "Already signed in as {} <{}>. Run 'thrapy logout' first to switch accounts.",
            identity.full_name, identity.email
        );
        return Ok(());
    }

    println!("🔐 Sign in to Thrapy");
    let email = text_or_prompt(input.email, "Email")?;
    let password = password_or_prompt(input.password, false)?;

    let identity = auth.login(&email, &password).await?;
    println!("✅ Signed in as {} ({})", identity.full_name, identity.role);
    warn_if_unsaved(auth);
    Ok(())
}

pub async fn register_view(
    auth: &mut AuthController,
    input: RegisterInput,
) -> Result<(), AccountError> {
    if auth.is_authenticated() {
        println!("Already signed in. Run 'thrapy logout' before creating another account.");
        return Ok(());
    }

    println!("📝 Create your Thrapy account");
    let form = RegistrationForm {
        full_name: text_or_prompt(input.full_name, "Full name")?,
        email: text_or_prompt(input.email, "Email")?,
        password: password_or_prompt(input.password, true)?,
        role: role_or_prompt(input.role)?,
    };

    let identity = auth.register(&form).await?;
    println!("✅ Welcome, {}! Your account is ready.", identity.full_name);
    warn_if_unsaved(auth);
    if identity.role == Role::Therapist {
        println!("Next: run 'thrapy therapist-profile' so clients can find you.");
    }
    Ok(())
}

fn warn_if_unsaved(auth: &AuthController) {
    let Some(reason) = auth.unsaved_reason() else {
        return;
    };
    println!("⚠️  Signed in for this run only: {reason}");
    if reason.is_keyring_unavailable() {
        println!("   Unlock the system keyring, or run 'thrapy set session-backend file'.");
    }
}

pub fn logout_view(auth: &mut AuthController) {
    let was_signed_in = auth.is_authenticated();
    auth.logout();
    if was_signed_in {
        println!("👋 Signed out");
    } else {
        println!("Not signed in");
    }
}

pub fn whoami_view(auth: &AuthController) {
    match auth.current_user() {
        Some(identity) => {
            println!("{} <{}>", identity.full_name, identity.email);
            println!("  role: {}", identity.role);
            println!("  id: {}", identity.id);
            println!("  session stored in: {}", auth.store_location());
        }
        None => println!("Not signed in. Run 'thrapy login' or 'thrapy register'."),
    }
}
