//! Event form state and submission.
//!
//! [`EventForm`] mirrors the browser's event-creation form: every text input
//! is a string (including `maxAttendees`, which the backend coerces), and the
//! initial state matches the form's defaults - category `social`, public
//! checkbox ticked.
//!
//! Submission distinguishes three failure shapes, matching how a browser
//! client reports them:
//! - [`SubmitError::Server`] - the backend answered with an error body
//! - [`SubmitError::NoResponse`] - the request went out but nothing came back
//! - [`SubmitError::Request`] - the request could not be constructed at all

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::ApiClient;

/// Errors that can occur when submitting an event.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The backend responded with an error body.
    #[error("server rejected the event ({status}): {error}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// The server's error detail.
        error: String,
    },

    /// The request was sent but no response arrived (connect failure or
    /// timeout).
    #[error("no response from server: {0}")]
    NoResponse(String),

    /// The request could not be constructed or processed client-side.
    #[error("request error: {0}")]
    Request(String),
}

/// Event categories offered by the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Social,
    Business,
    Education,
    Sports,
    Other,
}

/// The form's field state.
///
/// `Default` reproduces the form's initial state: empty text fields,
/// category `social`, `is_public` ticked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub event_name: String,
    pub description: String,
    /// Calendar date as entered (`YYYY-MM-DD`).
    pub date: String,
    /// Time-of-day as entered (`HH:MM`).
    pub time: String,
    pub location: String,
    /// Attendee cap as entered; blank means no cap.
    pub max_attendees: String,
    pub category: Category,
    pub is_public: bool,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            event_name: String::new(),
            description: String::new(),
            date: String::new(),
            time: String::new(),
            location: String::new(),
            max_attendees: String::new(),
            category: Category::Social,
            is_public: true,
        }
    }
}

/// A successfully created event, as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    /// Confirmation message.
    pub message: String,

    /// Store-assigned identifier.
    pub event_id: String,

    /// The persisted document.
    pub event: Value,
}

/// Error body shape the backend uses for failed creations.
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    error: String,
    details: Option<String>,
}

impl EventForm {
    /// Submits the form via `POST /events`.
    ///
    /// The caller decides what to do with the form afterwards; on success it
    /// typically calls [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// Returns the three-way [`SubmitError`] taxonomy described at the
    /// module level.
    pub async fn submit(&self, api: &ApiClient) -> Result<CreatedEvent, SubmitError> {
        let response = api
            .http()
            .post(api.endpoint("/events"))
            .json(self)
            .send()
            .await
            .map_err(|e| {
                // Connect failures also count as request errors in reqwest's
                // taxonomy, so check them first.
                if e.is_timeout() || e.is_connect() {
                    SubmitError::NoResponse(e.to_string())
                } else if e.is_builder() {
                    SubmitError::Request(e.to_string())
                } else {
                    SubmitError::NoResponse(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = serde_json::from_str::<ServerErrorBody>(&body)
                .map(|e| e.details.unwrap_or(e.error))
                .unwrap_or(body);
            warn!(status = %status, error = %error, "Event submission rejected");
            return Err(SubmitError::Server {
                status: status.as_u16(),
                error,
            });
        }

        let created: CreatedEvent = response
            .json()
            .await
            .map_err(|e| SubmitError::Request(format!("failed to parse response: {e}")))?;

        debug!(event_id = %created.event_id, "Event created");
        Ok(created)
    }

    /// Clears the form back to its initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
