//! State behind the therapist list view.

use crate::api::{
    ApiError, CreateSessionRequest, Credential, SessionKind, SessionRef, TherapistProfile,
    TherapyApi,
};
use crate::core::chat::session_cost;
use crate::core::gate::ActionGate;
use thiserror::Error;
use tracing::{debug, info};

pub const LOAD_FAILED: &str = "Failed to load therapists";
pub const BOOKING_FAILED: &str = "Failed to book session";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("No therapist matches '{0}'")]
    UnknownTherapist(String),

    #[error("Another request is still in progress")]
    Busy,

    #[error("{message}")]
    Backend {
        message: String,
        #[source]
        source: ApiError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub session: SessionRef,
    pub therapist_id: String,
    pub duration_minutes: u32,
    pub cost: f64,
}

#[derive(Debug, Default)]
pub struct TherapistDirectory {
    therapists: Option<Vec<TherapistProfile>>,
    gate: ActionGate,
}

impl TherapistDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn therapists(&self) -> &[TherapistProfile] {
        self.therapists.as_deref().unwrap_or(&[])
    }

    /// Fetch the list the first time; later calls reuse it.
    pub async fn load(
        &mut self,
        api: &dyn TherapyApi,
        credential: Option<&Credential>,
    ) -> Result<&[TherapistProfile], DirectoryError> {
        if self.therapists.is_none() {
            let ticket = self.gate.begin().ok_or(DirectoryError::Busy)?;
            let result = api.list_therapists(credential).await;
            if !self.gate.finish(ticket) {
                return Err(DirectoryError::Busy);
            }
            let therapists = result.map_err(|source| DirectoryError::Backend {
                message: source.user_message(LOAD_FAILED),
                source,
            })?;
            debug!(count = therapists.len(), "therapists loaded");
            self.therapists = Some(therapists);
        }
        Ok(self.therapists())
    }

    /// Look a therapist up by id, or by 1-based position in the list.
    pub fn find(&self, selector: &str) -> Option<&TherapistProfile> {
        let selector = selector.trim();
        let therapists = self.therapists();
        therapists
            .iter()
            .find(|therapist| therapist.id == selector)
            .or_else(|| {
                selector
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| index.checked_sub(1))
                    .and_then(|index| therapists.get(index))
            })
    }

    pub async fn book(
        &mut self,
        api: &dyn TherapyApi,
        credential: Option<&Credential>,
        selector: &str,
        minutes: u32,
    ) -> Result<Booking, DirectoryError> {
        let therapist = self
            .find(selector)
            .ok_or_else(|| DirectoryError::UnknownTherapist(selector.trim().to_string()))?;
        let request = CreateSessionRequest {
            session_type: SessionKind::Therapist,
            therapist_id: Some(therapist.id.clone()),
            duration_minutes: minutes,
            cost: session_cost(therapist.hourly_rate, minutes),
        };

        let ticket = self.gate.begin().ok_or(DirectoryError::Busy)?;
        let result = api.create_session(credential, &request).await;
        if !self.gate.finish(ticket) {
            return Err(DirectoryError::Busy);
        }
        let created = result.map_err(|source| DirectoryError::Backend {
            message: source.user_message(BOOKING_FAILED),
            source,
        })?;

        info!(session_id = %created.id, therapist_id = ?request.therapist_id, "session booked");
        Ok(Booking {
            session: created.id,
            therapist_id: request.therapist_id.unwrap_or_default(),
            duration_minutes: minutes,
            cost: created.cost.unwrap_or(request.cost),
        })
    }
}
