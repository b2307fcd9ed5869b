//! Request and response payloads exchanged with the therapy backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Therapist,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Therapist => "therapist",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "therapist" => Ok(Role::Therapist),
            "admin" => Ok(Role::Admin),
            other => Err(format!(
                "Unknown role '{other}'. Expected one of: client, therapist, admin"
            )),
        }
    }
}

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Opaque bearer token issued alongside an [`Identity`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Backend identifier of a created therapy session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRef(String);

impl SessionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: Identity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapistProfile {
    pub id: String,
    pub user_id: String,
    pub hourly_rate: f64,
    pub specialization: String,
    pub years_experience: u32,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Ai,
    Therapist,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Ai => "ai",
            SessionKind::Therapist => "therapist",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub session_type: SessionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub therapist_id: Option<String>,
    pub duration_minutes: u32,
    pub cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSession {
    pub id: SessionRef,
    #[serde(default)]
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    #[serde(default)]
    pub therapist_id: Option<String>,
    pub session_type: SessionKind,
    pub duration_minutes: u32,
    pub cost: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatHistoryEntry {
    pub user_message: String,
    pub ai_response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub session_id: String,
    pub amount: f64,
    pub payment_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub platform_fee: Option<f64>,
    #[serde(default)]
    pub therapist_earnings: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TherapistRegistration {
    pub license_number: String,
    pub specialization: String,
    pub hourly_rate: f64,
    pub bio: String,
    pub years_experience: u32,
}

/// Weekly availability window. `day_of_week` is 0 (Monday) through 6 (Sunday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilitySlot {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityRequest {
    pub therapist_id: String,
    pub availability: Vec<AvailabilitySlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}
