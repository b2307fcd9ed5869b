//! Interactive prompts shared by the views.

use crate::api::Role;
use dialoguer::{Confirm, Input, Password, Select};
use std::fmt;

#[derive(Debug, Clone)]
pub struct UiError {
    message: String,
}

impl UiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UiError {}

impl From<dialoguer::Error> for UiError {
    fn from(err: dialoguer::Error) -> Self {
        UiError::new(format!("Failed to read input: {err}"))
    }
}

/// Use `provided` when given, otherwise ask.
pub fn text_or_prompt(provided: Option<String>, label: &str) -> Result<String, UiError> {
    match provided {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Ok(Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?),
    }
}

pub fn password_or_prompt(provided: Option<String>, confirm: bool) -> Result<String, UiError> {
    if let Some(value) = provided.filter(|value| !value.is_empty()) {
        return Ok(value);
    }
    let mut prompt = Password::new().with_prompt("Password").allow_empty_password(true);
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

pub fn role_or_prompt(provided: Option<Role>) -> Result<Role, UiError> {
    if let Some(role) = provided {
        return Ok(role);
    }
    let choices = [
        "I'm looking for therapy (client)",
        "I'm a licensed therapist",
    ];
    let index = Select::new()
        .with_prompt("Account type")
        .items(&choices)
        .default(0)
        .interact()?;
    Ok(if index == 1 { Role::Therapist } else { Role::Client })
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool, UiError> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Pick one of `items`, or `None` if the user chose to cancel.
pub fn select_or_cancel(prompt: &str, items: &[String]) -> Result<Option<usize>, UiError> {
    let mut options: Vec<&str> = items.iter().map(String::as_str).collect();
    options.push("Cancel");
    let index = Select::new()
        .with_prompt(prompt)
        .items(&options)
        .default(0)
        .interact()?;
    Ok((index < items.len()).then_some(index))
}
