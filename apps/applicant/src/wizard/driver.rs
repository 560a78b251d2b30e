use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::api_client::ApplicationApi;
use crate::models::application::ApplicationData;
use crate::session_store::SessionStore;
use crate::wizard::machine::{Command, Notice, Route, WizardEvent, WizardMachine};

/// What the wizard needs from whoever is displaying it.
pub trait WizardHost: Send + Sync {
    fn notify(&self, notice: &Notice);
    fn navigate(&self, route: &Route);
}

/// Host that only remembers what it was told. Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    notices: Mutex<Vec<Notice>>,
    routes: Mutex<Vec<Route>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl WizardHost for RecordingHost {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice.clone());
    }

    fn navigate(&self, route: &Route) {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(route.clone());
    }
}

/// Runs a [`WizardMachine`] against real collaborators.
///
/// The machine lock is only ever held while applying an event, never across an
/// `.await`, so concurrent triggers observe the in-flight flag and are dropped.
pub struct ApplicationWizard {
    machine: Mutex<WizardMachine>,
    api: Arc<dyn ApplicationApi>,
    store: Arc<dyn SessionStore>,
    host: Arc<dyn WizardHost>,
}

impl ApplicationWizard {
    pub fn new(
        job_id: impl Into<String>,
        api: Arc<dyn ApplicationApi>,
        store: Arc<dyn SessionStore>,
        host: Arc<dyn WizardHost>,
    ) -> Self {
        Self {
            machine: Mutex::new(WizardMachine::new(job_id)),
            api,
            store,
            host,
        }
    }

    /// Resumes the stored session for this job, or starts a new application.
    pub async fn begin(&self) {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring unreadable stored session: {}", e);
                None
            }
        };
        self.dispatch(WizardEvent::Begin { stored }).await;
    }

    pub async fn next(&self) {
        self.dispatch(WizardEvent::Next).await;
    }

    pub async fn back(&self) {
        self.dispatch(WizardEvent::Back).await;
    }

    pub async fn submit(&self) {
        self.dispatch(WizardEvent::Submit).await;
    }

    pub async fn leave(&self) {
        self.dispatch(WizardEvent::Leave).await;
    }

    /// Applies a form edit to the in-memory application data.
    pub fn edit<R>(&self, f: impl FnOnce(&mut ApplicationData) -> R) -> R {
        f(self.lock().data_mut())
    }

    /// A copy of the current machine state for rendering.
    pub fn snapshot(&self) -> WizardMachine {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, WizardMachine> {
        self.machine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(&self, event: WizardEvent) -> Vec<Command> {
        let mut machine = self.lock();
        machine.handle(event)
    }

    async fn dispatch(&self, event: WizardEvent) {
        let mut queue: VecDeque<Command> = self.apply(event).into();
        while let Some(command) = queue.pop_front() {
            if let Some(follow_up) = self.execute(command).await {
                queue.extend(self.apply(follow_up));
            }
        }
    }

    /// Performs one command; backend calls yield the event describing their result.
    async fn execute(&self, command: Command) -> Option<WizardEvent> {
        match command {
            Command::StartApplication { job_id } => {
                Some(match self.api.start_application(&job_id).await {
                    Ok(started) => WizardEvent::Started(started),
                    Err(e) => WizardEvent::StartFailed(e.user_facing().1),
                })
            }
            Command::FetchStatus { application_id } => {
                Some(match self.api.application_status(&application_id).await {
                    Ok(status) => WizardEvent::StatusLoaded(status),
                    Err(e) => {
                        warn!("Status check for {} failed: {}", application_id, e);
                        WizardEvent::StatusUnavailable
                    }
                })
            }
            Command::SaveStep {
                application_id,
                payload,
            } => {
                let step = payload.step();
                Some(match self.api.save_step(&application_id, &payload).await {
                    Ok(saved) => WizardEvent::StepSaved {
                        step,
                        prefill: saved.prefill_data,
                    },
                    Err(e) => WizardEvent::StepSaveFailed {
                        step,
                        message: e.user_facing().1,
                    },
                })
            }
            Command::FetchReview { application_id } => {
                Some(match self.api.review_snapshot(&application_id).await {
                    Ok(snapshot) => WizardEvent::ReviewLoaded(snapshot),
                    Err(e) => {
                        warn!("Review snapshot for {} failed: {}", application_id, e);
                        WizardEvent::ReviewUnavailable
                    }
                })
            }
            Command::Finalize { application_id } => {
                Some(match self.api.finalize(&application_id).await {
                    Ok(receipt) => WizardEvent::Finalized(receipt),
                    Err(e) => WizardEvent::FinalizeFailed(e.user_facing().1),
                })
            }
            Command::FetchProfile => Some(match self.api.user_profile().await {
                Ok(profile) => WizardEvent::ProfileLoaded(profile),
                Err(e) => {
                    warn!("Profile fetch after submit failed: {}", e);
                    WizardEvent::ProfileUnavailable
                }
            }),
            Command::PersistSession(session) => {
                if let Err(e) = self.store.save(&session) {
                    warn!("Could not store session {}: {}", session.application_id, e);
                }
                None
            }
            Command::ClearSession => {
                if let Err(e) = self.store.clear() {
                    warn!("Could not clear stored session: {}", e);
                }
                None
            }
            Command::Notify(notice) => {
                self.host.notify(&notice);
                None
            }
            Command::Navigate(route) => {
                debug!("Navigating to {}", route.path());
                self.host.navigate(&route);
                None
            }
        }
    }
}
