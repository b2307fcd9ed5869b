use crate::api::{
    ApiError, AuthResponse, AvailabilityRequest, ChatHistoryEntry, CreateSessionRequest,
    CreatedSession, Credential, HealthStatus, Identity, LoginRequest, PaymentRecord,
    RegisterRequest, Role, SessionRecord, SessionRef, TherapistProfile, TherapistRegistration,
    TherapyApi,
};
use crate::core::kv::{KvBackend, KvError, MemoryBackend};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn sample_identity() -> Identity {
    Identity {
        id: "1".to_string(),
        full_name: "A".to_string(),
        email: "a@b.com".to_string(),
        role: Role::Client,
        created_at: None,
    }
}

pub fn auth_response(token: &str) -> AuthResponse {
    AuthResponse {
        access_token: token.to_string(),
        token_type: Some("bearer".to_string()),
        user: sample_identity(),
    }
}

pub fn sample_therapist(id: &str, hourly_rate: f64) -> TherapistProfile {
    TherapistProfile {
        id: id.to_string(),
        user_id: format!("user-{id}"),
        hourly_rate,
        specialization: "Anxiety".to_string(),
        years_experience: 7,
        bio: "Calm and practical.".to_string(),
        license_number: None,
        is_available: true,
    }
}

/// Lets a test keep a handle on a [`MemoryBackend`] it gave away.
pub struct SharedBackend(pub Arc<MemoryBackend>);

impl KvBackend for SharedBackend {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.0.get(key)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), KvError> {
        self.0.set_many(entries)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), KvError> {
        self.0.remove_many(keys)
    }

    fn describe(&self) -> String {
        self.0.describe()
    }
}

#[derive(Default)]
struct Recorded {
    credential: Option<String>,
    register: Option<RegisterRequest>,
    create_session: Option<CreateSessionRequest>,
    chat: Option<(String, String)>,
    profile: Option<TherapistRegistration>,
    availability: Option<AvailabilityRequest>,
}

/// In-process [`TherapyApi`] with canned answers.
///
/// One-shot results (`with_login`, `with_*_error`, ...) are consumed by the
/// first matching call; later calls fall back to a default answer.
#[derive(Default)]
pub struct FakeApi {
    calls: AtomicUsize,
    login: Mutex<Option<Result<AuthResponse, ApiError>>>,
    register: Mutex<Option<Result<AuthResponse, ApiError>>>,
    session_id: Option<String>,
    create_session_error: Mutex<Option<ApiError>>,
    chat_reply: Mutex<Option<Result<String, ApiError>>>,
    history: Vec<ChatHistoryEntry>,
    therapists: Vec<TherapistProfile>,
    therapists_error: Mutex<Option<ApiError>>,
    sessions: Vec<SessionRecord>,
    payments: Vec<PaymentRecord>,
    recorded: Mutex<Recorded>,
}

fn take<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    slot.lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}

fn unconfigured() -> ApiError {
    ApiError::Backend {
        status: StatusCode::NOT_IMPLEMENTED,
        detail: Some("not configured in FakeApi".to_string()),
    }
}

impl FakeApi {
    pub fn with_login(self, result: Result<AuthResponse, ApiError>) -> Self {
        *self.login.lock().expect("lock") = Some(result);
        self
    }

    pub fn with_register(self, result: Result<AuthResponse, ApiError>) -> Self {
        *self.register.lock().expect("lock") = Some(result);
        self
    }

    pub fn with_session_id(mut self, id: &str) -> Self {
        self.session_id = Some(id.to_string());
        self
    }

    pub fn with_create_session_error(self, err: ApiError) -> Self {
        *self.create_session_error.lock().expect("lock") = Some(err);
        self
    }

    pub fn with_chat_reply(self, result: Result<String, ApiError>) -> Self {
        *self.chat_reply.lock().expect("lock") = Some(result);
        self
    }

    pub fn with_history(mut self, history: Vec<ChatHistoryEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_therapists(mut self, therapists: Vec<TherapistProfile>) -> Self {
        self.therapists = therapists;
        self
    }

    pub fn with_therapists_error(self, err: ApiError) -> Self {
        *self.therapists_error.lock().expect("lock") = Some(err);
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<SessionRecord>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_payments(mut self, payments: Vec<PaymentRecord>) -> Self {
        self.payments = payments;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_credential(&self) -> Option<String> {
        self.recorded().credential.clone()
    }

    pub fn last_register(&self) -> Option<RegisterRequest> {
        self.recorded().register.clone()
    }

    pub fn last_create_session(&self) -> Option<CreateSessionRequest> {
        self.recorded().create_session.clone()
    }

    pub fn last_chat(&self) -> Option<(String, String)> {
        self.recorded().chat.clone()
    }

    pub fn last_profile(&self) -> Option<TherapistRegistration> {
        self.recorded().profile.clone()
    }

    pub fn last_availability(&self) -> Option<AvailabilityRequest> {
        self.recorded().availability.clone()
    }

    fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn hit(&self, credential: Option<&Credential>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded().credential = credential.map(|c| c.as_str().to_string());
    }
}

#[async_trait]
impl TherapyApi for FakeApi {
    async fn login(&self, _request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.hit(None);
        take(&self.login).unwrap_or_else(|| Err(unconfigured()))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.hit(None);
        self.recorded().register = Some(request.clone());
        take(&self.register).unwrap_or_else(|| Err(unconfigured()))
    }

    async fn list_therapists(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<TherapistProfile>, ApiError> {
        self.hit(credential);
        match take(&self.therapists_error) {
            Some(err) => Err(err),
            None => Ok(self.therapists.clone()),
        }
    }

    async fn create_session(
        &self,
        credential: Option<&Credential>,
        request: &CreateSessionRequest,
    ) -> Result<CreatedSession, ApiError> {
        self.hit(credential);
        self.recorded().create_session = Some(request.clone());
        if let Some(err) = take(&self.create_session_error) {
            return Err(err);
        }
        Ok(CreatedSession {
            id: SessionRef::new(self.session_id.as_deref().unwrap_or("session-1")),
            cost: Some(request.cost),
        })
    }

    async fn send_chat_message(
        &self,
        credential: Option<&Credential>,
        session: &SessionRef,
        message: &str,
    ) -> Result<String, ApiError> {
        self.hit(credential);
        self.recorded().chat = Some((session.as_str().to_string(), message.to_string()));
        take(&self.chat_reply).unwrap_or_else(|| Ok(format!("You said: {message}")))
    }

    async fn list_sessions(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<SessionRecord>, ApiError> {
        self.hit(credential);
        Ok(self.sessions.clone())
    }

    async fn chat_history(
        &self,
        credential: Option<&Credential>,
        _session: &SessionRef,
    ) -> Result<Vec<ChatHistoryEntry>, ApiError> {
        self.hit(credential);
        Ok(self.history.clone())
    }

    async fn payment_history(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<PaymentRecord>, ApiError> {
        self.hit(credential);
        Ok(self.payments.clone())
    }

    async fn register_therapist_profile(
        &self,
        credential: Option<&Credential>,
        request: &TherapistRegistration,
    ) -> Result<TherapistProfile, ApiError> {
        self.hit(credential);
        self.recorded().profile = Some(request.clone());
        Ok(TherapistProfile {
            license_number: Some(request.license_number.clone()),
            specialization: request.specialization.clone(),
            hourly_rate: request.hourly_rate,
            bio: request.bio.clone(),
            years_experience: request.years_experience,
            ..sample_therapist("th-new", request.hourly_rate)
        })
    }

    async fn set_availability(
        &self,
        credential: Option<&Credential>,
        request: &AvailabilityRequest,
    ) -> Result<String, ApiError> {
        self.hit(credential);
        self.recorded().availability = Some(request.clone());
        Ok("Availability updated successfully".to_string())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.hit(None);
        Ok(HealthStatus {
            status: "healthy".to_string(),
            timestamp: None,
        })
    }
}
