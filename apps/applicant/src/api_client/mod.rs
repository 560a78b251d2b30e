//! Persistence client: the single point of entry for all backend calls made by the wizard.
//!
//! Every operation returns `ApiResult<T>`; HTTP failures, timeouts and backend
//! refusals come back as `Err(ApiError)`, never as panics.
//!
//! Reads (`review`, `status`, `profile`) retry on 429/5xx/transport errors with
//! exponential backoff. Writes are sent exactly once: starting an application
//! is not idempotent on the backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::errors::{ApiError, ApiResult};
use crate::mapper::StepPayload;
use crate::models::profile::{ApplicationStatus, UserProfile};
use crate::models::review::ReviewSnapshot;
use crate::models::step::Step;

#[cfg(test)]
pub(crate) mod fake;

const DEFAULT_READ_RETRIES: u32 = 3;
pub const MAX_READ_RETRIES: u32 = 8;

/// Result of `POST /applications/new/steps/1`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartedApplication {
    pub application_id: String,
    #[serde(default)]
    pub prefill_data: Option<Value>,
    #[serde(default)]
    pub target_step: Option<u8>,
}

/// Result of a successful step save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepSaved {
    pub prefill_data: Option<Value>,
}

/// Result of a successful finalize call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalizeReceipt {
    pub redirect_hint: Option<String>,
}

/// Backend operations the wizard depends on.
///
/// Carried by the wizard as `Arc<dyn ApplicationApi>` so tests can substitute
/// a scripted backend.
#[async_trait]
pub trait ApplicationApi: Send + Sync {
    async fn start_application(&self, job_id: &str) -> ApiResult<StartedApplication>;

    async fn save_step(&self, application_id: &str, payload: &StepPayload)
        -> ApiResult<StepSaved>;

    async fn review_snapshot(&self, application_id: &str) -> ApiResult<ReviewSnapshot>;

    async fn application_status(&self, application_id: &str) -> ApiResult<ApplicationStatus>;

    async fn finalize(&self, application_id: &str) -> ApiResult<FinalizeReceipt>;

    async fn user_profile(&self) -> ApiResult<UserProfile>;
}

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    job_id: &'a str,
}

#[derive(Debug, Serialize)]
struct SaveStepRequest<'a> {
    step_data: &'a StepPayload,
}

#[derive(Debug, Deserialize)]
struct SaveStepResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<SaveStepData>,
    #[serde(default, alias = "error")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveStepData {
    #[serde(default)]
    prefill_data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct FinalizeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, alias = "redirect", alias = "redirect_to")]
    redirect_url: Option<String>,
    #[serde(default, alias = "error")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "detail", alias = "error")]
    message: String,
}

/// reqwest-backed implementation of [`ApplicationApi`].
///
/// The underlying client keeps a cookie store so the backend's session cookie
/// rides along on every request.
#[derive(Clone)]
pub struct HttpApplicationApi {
    client: Client,
    base_url: String,
    read_retries: u32,
}

impl HttpApplicationApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            read_retries: DEFAULT_READ_RETRIES,
        })
    }

    pub fn with_read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries.clamp(1, MAX_READ_RETRIES);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("accept", "application/json")
    }

    /// Sends a write exactly once.
    async fn send_once(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        check_status(response).await
    }

    /// GETs `path`, retrying on 429 and 5xx responses and on transport errors.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..self.read_retries {
            if attempt > 0 {
                // Exponential backoff: 250ms, 500ms, 1s, ...
                let delay = backoff_delay(attempt);
                warn!(
                    "GET {} attempt {} failed, retrying after {}ms...",
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.request(Method::GET, path).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ApiError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("GET {} returned {}: {}", path, status, body);
                last_error = Some(ApiError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            let response = check_status(response).await?;
            return Ok(response.json::<T>().await?);
        }

        Err(last_error.unwrap_or(ApiError::RetriesExhausted {
            retries: self.read_retries,
        }))
    }
}

/// Exponential backoff before retry `attempt` (1-based): 250ms, 500ms, 1s, ...
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_millis(250u64.saturating_mul(factor))
}

/// Converts non-2xx responses into `ApiError::Api`, extracting the backend's message when present.
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

fn require_id(application_id: &str) -> ApiResult<&str> {
    let trimmed = application_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidArgument(
            "application id must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

#[async_trait]
impl ApplicationApi for HttpApplicationApi {
    async fn start_application(&self, job_id: &str) -> ApiResult<StartedApplication> {
        if job_id.trim().is_empty() {
            return Err(ApiError::InvalidArgument("job id must not be empty".to_string()));
        }

        let response = self
            .send_once(
                self.request(Method::POST, "/applications/new/steps/1")
                    .json(&StartRequest { job_id }),
            )
            .await?;
        let started: StartedApplication = response.json().await?;
        if started.application_id.trim().is_empty() {
            return Err(ApiError::MalformedResponse(
                "start response carried an empty application_id".to_string(),
            ));
        }

        info!(
            "Started application {} for job {}",
            started.application_id, job_id
        );
        Ok(started)
    }

    async fn save_step(
        &self,
        application_id: &str,
        payload: &StepPayload,
    ) -> ApiResult<StepSaved> {
        let id = require_id(application_id)?;
        let step = payload.step();
        let path = format!("/applications/{}/steps/{}", id, step.number());

        let response = self
            .send_once(
                self.request(Method::POST, &path)
                    .json(&SaveStepRequest { step_data: payload }),
            )
            .await?;
        let body: SaveStepResponse = response.json().await?;
        if !body.success {
            return Err(ApiError::Rejected(
                body.message
                    .unwrap_or_else(|| format!("{step} was not accepted")),
            ));
        }

        let prefill_data = body.data.and_then(|d| d.prefill_data);
        debug!(
            "Saved {} for application {} (prefill: {})",
            step,
            id,
            prefill_data.is_some()
        );
        Ok(StepSaved { prefill_data })
    }

    async fn review_snapshot(&self, application_id: &str) -> ApiResult<ReviewSnapshot> {
        let id = require_id(application_id)?;
        self.get_json(&format!("/applications/{id}/review")).await
    }

    async fn application_status(&self, application_id: &str) -> ApiResult<ApplicationStatus> {
        let id = require_id(application_id)?;
        self.get_json(&format!("/applications/{id}/status")).await
    }

    async fn finalize(&self, application_id: &str) -> ApiResult<FinalizeReceipt> {
        let id = require_id(application_id)?;
        let path = format!("/applications/{}/steps/{}", id, Step::Review.number());

        let response = self
            .send_once(
                self.request(Method::POST, &path)
                    .json(&json!({ "submit_application": true })),
            )
            .await?;
        let body: FinalizeResponse = response.json().await?;
        if !body.success {
            return Err(ApiError::Rejected(
                body.message
                    .unwrap_or_else(|| "The application could not be submitted".to_string()),
            ));
        }

        info!("Finalized application {}", id);
        Ok(FinalizeReceipt {
            redirect_hint: body.redirect_url,
        })
    }

    async fn user_profile(&self) -> ApiResult<UserProfile> {
        self.get_json("/users/profile").await
    }
}
