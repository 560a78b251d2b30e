//! Scripted in-process backend used by the wizard's unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ApplicationApi, FinalizeReceipt, StartedApplication, StepSaved};
use crate::errors::{ApiError, ApiResult};
use crate::mapper::StepPayload;
use crate::models::profile::{ApplicationStatus, UserProfile};
use crate::models::review::ReviewSnapshot;
use crate::models::step::Step;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Start(String),
    Save(String, Step),
    Review(String),
    Status(String),
    Finalize(String),
    Profile,
}

/// Each operation answers from its own queue; an empty queue falls back to a
/// default success (or failure, for reads with no sensible default).
#[derive(Default)]
pub(crate) struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    pub saved: Mutex<Vec<StepPayload>>,
    pub starts: Mutex<VecDeque<ApiResult<StartedApplication>>>,
    pub saves: Mutex<VecDeque<ApiResult<StepSaved>>>,
    pub reviews: Mutex<VecDeque<ApiResult<ReviewSnapshot>>>,
    pub statuses: Mutex<VecDeque<ApiResult<ApplicationStatus>>>,
    pub finalizes: Mutex<VecDeque<ApiResult<FinalizeReceipt>>>,
    pub profiles: Mutex<VecDeque<ApiResult<UserProfile>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matcher(c)).count()
    }

    pub fn push_start(&self, result: ApiResult<StartedApplication>) {
        self.starts.lock().unwrap().push_back(result);
    }

    pub fn push_save(&self, result: ApiResult<StepSaved>) {
        self.saves.lock().unwrap().push_back(result);
    }

    pub fn push_save_prefill(&self, prefill: Value) {
        self.push_save(Ok(StepSaved {
            prefill_data: Some(prefill),
        }));
    }

    pub fn push_review(&self, result: ApiResult<ReviewSnapshot>) {
        self.reviews.lock().unwrap().push_back(result);
    }

    pub fn push_status(&self, result: ApiResult<ApplicationStatus>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub fn push_finalize(&self, result: ApiResult<FinalizeReceipt>) {
        self.finalizes.lock().unwrap().push_back(result);
    }

    pub fn push_profile(&self, result: ApiResult<UserProfile>) {
        self.profiles.lock().unwrap().push_back(result);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub(crate) fn unavailable() -> ApiError {
    ApiError::Api {
        status: 503,
        message: "backend unavailable".to_string(),
    }
}

#[async_trait]
impl ApplicationApi for FakeApi {
    async fn start_application(&self, job_id: &str) -> ApiResult<StartedApplication> {
        self.record(Call::Start(job_id.to_string()));
        tokio::task::yield_now().await;
        self.starts.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(StartedApplication {
                application_id: "app-1".to_string(),
                prefill_data: None,
                target_step: None,
            })
        })
    }

    async fn save_step(
        &self,
        application_id: &str,
        payload: &StepPayload,
    ) -> ApiResult<StepSaved> {
        self.record(Call::Save(application_id.to_string(), payload.step()));
        self.saved.lock().unwrap().push(payload.clone());
        tokio::task::yield_now().await;
        self.saves
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(StepSaved::default()))
    }

    async fn review_snapshot(&self, application_id: &str) -> ApiResult<ReviewSnapshot> {
        self.record(Call::Review(application_id.to_string()));
        tokio::task::yield_now().await;
        self.reviews
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn application_status(&self, application_id: &str) -> ApiResult<ApplicationStatus> {
        self.record(Call::Status(application_id.to_string()));
        tokio::task::yield_now().await;
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn finalize(&self, application_id: &str) -> ApiResult<FinalizeReceipt> {
        self.record(Call::Finalize(application_id.to_string()));
        tokio::task::yield_now().await;
        self.finalizes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(FinalizeReceipt::default()))
    }

    async fn user_profile(&self) -> ApiResult<UserProfile> {
        self.record(Call::Profile);
        tokio::task::yield_now().await;
        self.profiles
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(UserProfile::default()))
    }
}
