//! HTTP gateway to the therapy backend.
//!
//! [`ApiClient`] is a thin, stateless wrapper around `reqwest`. Every call is
//! a single request/response with no retries and no caching. Credentials are
//! passed per call so nothing about the signed-in user leaks into client
//! defaults.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::utils::url::{api_url_from_segments, construct_api_url, normalize_base_url};

pub mod error;
pub mod models;


pub use error::{extract_error_detail, ApiError};
pub use models::{
    AuthResponse, AvailabilityRequest, AvailabilitySlot, ChatHistoryEntry, CreateSessionRequest,
    CreatedSession, Credential, HealthStatus, Identity, LoginRequest, PaymentRecord,
    RegisterRequest, Role, SessionKind, SessionRecord, SessionRef, TherapistProfile,
    TherapistRegistration,
};

/// Operations the rest of the client needs from the backend.
#[async_trait]
pub trait TherapyApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    async fn list_therapists(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<TherapistProfile>, ApiError>;

    async fn create_session(
        &self,
        credential: Option<&Credential>,
        request: &CreateSessionRequest,
    ) -> Result<CreatedSession, ApiError>;

    async fn send_chat_message(
        &self,
        credential: Option<&Credential>,
        session: &SessionRef,
        message: &str,
    ) -> Result<String, ApiError>;

    async fn list_sessions(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<SessionRecord>, ApiError>;

    async fn chat_history(
        &self,
        credential: Option<&Credential>,
        session: &SessionRef,
    ) -> Result<Vec<ChatHistoryEntry>, ApiError>;

    async fn payment_history(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<PaymentRecord>, ApiError>;

    async fn register_therapist_profile(
        &self,
        credential: Option<&Credential>,
        request: &TherapistRegistration,
    ) -> Result<TherapistProfile, ApiError>;

    async fn set_availability(
        &self,
        credential: Option<&Credential>,
        request: &AvailabilityRequest,
    ) -> Result<String, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    fn request(
        &self,
        method: Method,
        url: String,
        credential: Option<&Credential>,
    ) -> RequestBuilder {
        debug!(
            method = %method,
            url = %url,
            authorized = credential.is_some(),
            "backend request"
        );
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        match credential {
            Some(credential) => builder.header("Authorization", credential.bearer_value()),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        credential: Option<&Credential>,
    ) -> Result<T, ApiError> {
        self.get_json_at(construct_api_url(&self.base_url, endpoint), credential)
            .await
    }

    async fn get_json_at<T: DeserializeOwned>(
        &self,
        url: String,
        credential: Option<&Credential>,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::GET, url, credential).send().await?;
        decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        credential: Option<&Credential>,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .request(
                Method::POST,
                construct_api_url(&self.base_url, endpoint),
                credential,
            )
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = extract_error_detail(&body);
        debug!(status = %status, detail = ?detail, "backend error response");
        return Err(ApiError::Backend { status, detail });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

#[async_trait]
impl TherapyApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("auth/login", None, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("auth/register", None, request).await
    }

    async fn list_therapists(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<TherapistProfile>, ApiError> {
        self.get_json("therapists", credential).await
    }

    async fn create_session(
        &self,
        credential: Option<&Credential>,
        request: &CreateSessionRequest,
    ) -> Result<CreatedSession, ApiError> {
        self.post_json("sessions/create", credential, request).await
    }

    async fn send_chat_message(
        &self,
        credential: Option<&Credential>,
        session: &SessionRef,
        message: &str,
    ) -> Result<String, ApiError> {
        let request = models::ChatRequest {
            session_id: session.as_str().to_string(),
            message: message.to_string(),
        };
        let reply: models::ChatReply = self.post_json("ai-chat", credential, &request).await?;
        Ok(reply.response)
    }

    async fn list_sessions(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<SessionRecord>, ApiError> {
        self.get_json("sessions", credential).await
    }

    async fn chat_history(
        &self,
        credential: Option<&Credential>,
        session: &SessionRef,
    ) -> Result<Vec<ChatHistoryEntry>, ApiError> {
        let url = api_url_from_segments(
            &self.base_url,
            &["sessions", session.as_str(), "chat-history"],
        )
        .ok_or_else(|| ApiError::InvalidId {
            kind: "session",
            id: session.as_str().to_string(),
        })?;
        self.get_json_at(url.into(), credential).await
    }

    async fn payment_history(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<PaymentRecord>, ApiError> {
        self.get_json("payments/history", credential).await
    }

    async fn register_therapist_profile(
        &self,
        credential: Option<&Credential>,
        request: &TherapistRegistration,
    ) -> Result<TherapistProfile, ApiError> {
        self.post_json("therapist/register", credential, request)
            .await
    }

    async fn set_availability(
        &self,
        credential: Option<&Credential>,
        request: &AvailabilityRequest,
    ) -> Result<String, ApiError> {
        let reply: models::MessageResponse = self
            .post_json("therapist/availability", credential, request)
            .await?;
        Ok(reply.message)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("health", None).await
    }
}
