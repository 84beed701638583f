//! HTTP client for the remote recording service.
//!
//! Handles request construction, reply parsing into the tagged
//! [`ServiceReply`] union, and classification of transport failures for the
//! submission guard. The request deadline is owned by the guard, not this
//! client, so a slow service surfaces as the guard's timeout.

use checkpost_core::models::{Record, ServiceReply, WireReply};
use chrono::Utc;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::error::{Result, SubmitError};

/// Configuration for the recording service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint accepting record submissions.
    pub service_url: String,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum number of redirects to follow.
    pub max_redirects: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8787/checkin".to_string(),
            user_agent: "Checkpost/0.1".to_string(),
            max_redirects: 3,
        }
    }
}

/// HTTP client for submitting check-in records.
///
/// Uses connection pooling via a shared `reqwest` client. Transport
/// failures are mapped to [`SubmitError::Network`] so the guard can
/// classify them; malformed reply bodies surface as
/// [`SubmitError::InvalidReply`] and are never silently suppressed.
#[derive(Debug, Clone)]
pub struct RecordingClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl RecordingClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Configuration` if the service URL does not
    /// parse or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        url::Url::parse(&config.service_url).map_err(|e| {
            SubmitError::configuration(format!("invalid service URL {:?}: {e}", config.service_url))
        })?;

        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects as usize))
            .build()
            .map_err(|e| SubmitError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Submits one record to the recording service.
    ///
    /// Sends the serialized record as a JSON POST body; removal records
    /// additionally carry an `action=uncheck` query parameter. The reply
    /// body is parsed into the [`ServiceReply`] union regardless of HTTP
    /// status, since the service reports outcomes in the body.
    ///
    /// # Errors
    ///
    /// - `SubmitError::Network` for connection-level failures
    /// - `SubmitError::InvalidReply` when the body is not a well-formed
    ///   reply
    pub async fn submit(&self, record: &Record) -> Result<ServiceReply> {
        let attempt_id = Uuid::new_v4();
        let span = info_span!(
            "record_submission",
            name = %record.name,
            attempt_id = %attempt_id,
            uncheck = record.is_uncheck(),
        );

        async move {
            let mut request = self
                .client
                .post(&self.config.service_url)
                .json(record)
                .header("X-Checkpost-Attempt", attempt_id.to_string())
                .header("X-Checkpost-Submitted-At", Utc::now().to_rfc3339());

            if let Some(action) = record.action {
                request = request.query(&[("action", action.as_query_value())]);
            }

            let response = request.send().await.map_err(classify_transport)?;
            let status = response.status().as_u16();
            debug!(status, "recording service responded");

            let wire: WireReply = response.json().await.map_err(|e| {
                if e.is_decode() {
                    SubmitError::invalid_reply(format!("reply body did not parse: {e}"))
                } else {
                    classify_transport(e)
                }
            })?;

            Ok(ServiceReply::from(wire))
        }
        .instrument(span)
        .await
    }

    /// Fetches the identity names known to the recording service.
    ///
    /// A GET with no body; used by callers that validate typed names before
    /// submitting.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::submit`].
    pub async fn known_names(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.config.service_url)
            .send()
            .await
            .map_err(classify_transport)?;

        response.json().await.map_err(|e| {
            if e.is_decode() {
                SubmitError::invalid_reply(format!("name list did not parse: {e}"))
            } else {
                classify_transport(e)
            }
        })
    }
}

/// Maps a reqwest failure to the pipeline's transport taxonomy.
fn classify_transport(error: reqwest::Error) -> SubmitError {
    if error.is_connect() {
        SubmitError::network(format!("connection failed: {error}"))
    } else {
        SubmitError::network(error.to_string())
    }
}
