//! The wizard as an explicit state machine.
//!
//! `WizardMachine::handle` applies one event and returns the side effects the
//! driver must perform. It never performs I/O itself, so every transition can be
//! exercised synchronously.

use serde_json::Value;
use tracing::{debug, info};

use crate::api_client::{FinalizeReceipt, StartedApplication};
use crate::mapper::{from_wire, review_view, to_wire, StepPayload};
use crate::models::application::ApplicationData;
use crate::models::profile::{ApplicationStatus, UserProfile};
use crate::models::review::{Displayed, ReviewSnapshot};
use crate::models::session::ApplicationSession;
use crate::models::step::Step;
use crate::outcome::{resolve_outcome, Outcome};
use crate::wizard::validation::validate_step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Filling in (or reviewing, for `Step::Review`) a step.
    Editing(Step),
    /// Finalize or the follow-up profile fetch is in flight.
    Submitting,
    Submitted(Outcome),
    /// The candidate navigated away; late results are discarded.
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    JobPosting { job_id: String },
    Interview { job_id: String },
    UnderReview { job_id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::JobPosting { job_id } => format!("/jobs/{job_id}"),
            Route::Interview { job_id } => format!("/interview/{job_id}"),
            Route::UnderReview { job_id } => format!("/jobs/{job_id}/application-received"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A dismissible, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum WizardEvent {
    /// Wizard mounted. `stored` is whatever the session store held.
    Begin { stored: Option<ApplicationSession> },
    Started(StartedApplication),
    StartFailed(String),
    StatusLoaded(ApplicationStatus),
    StatusUnavailable,
    Next,
    Back,
    Submit,
    Leave,
    StepSaved { step: Step, prefill: Option<Value> },
    StepSaveFailed { step: Step, message: String },
    ReviewLoaded(ReviewSnapshot),
    ReviewUnavailable,
    Finalized(FinalizeReceipt),
    FinalizeFailed(String),
    ProfileLoaded(UserProfile),
    ProfileUnavailable,
}

/// Side effects requested by a transition, executed in order by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartApplication { job_id: String },
    FetchStatus { application_id: String },
    SaveStep { application_id: String, payload: StepPayload },
    FetchReview { application_id: String },
    Finalize { application_id: String },
    FetchProfile,
    PersistSession(ApplicationSession),
    ClearSession,
    Notify(Notice),
    Navigate(Route),
}

#[derive(Debug, Clone)]
pub struct WizardMachine {
    job_id: String,
    phase: Phase,
    application_id: Option<String>,
    data: ApplicationData,
    prefill: Option<Value>,
    processing: bool,
    review: Option<Displayed>,
    redirect_hint: Option<String>,
}

impl WizardMachine {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            phase: Phase::Editing(Step::FIRST),
            application_id: None,
            data: ApplicationData::default(),
            prefill: None,
            processing: false,
            review: None,
            redirect_hint: None,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The step being shown; `Submitting` still shows the review.
    pub fn current_step(&self) -> Option<Step> {
        match self.phase {
            Phase::Editing(step) => Some(step),
            Phase::Submitting => Some(Step::Review),
            Phase::Submitted(_) | Phase::Left => None,
        }
    }

    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    pub fn data(&self) -> &ApplicationData {
        &self.data
    }

    /// Change handler for renderers.
    pub fn data_mut(&mut self) -> &mut ApplicationData {
        &mut self.data
    }

    pub fn prefill(&self) -> Option<&Value> {
        self.prefill.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn review(&self) -> Option<&Displayed> {
        self.review.as_ref()
    }

    pub fn redirect_hint(&self) -> Option<&str> {
        self.redirect_hint.as_deref()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Submitted(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: WizardEvent) -> Vec<Command> {
        match event {
            WizardEvent::Begin { stored } => self.on_begin(stored),
            WizardEvent::Started(started) => self.on_started(started),
            WizardEvent::StartFailed(message) => self.on_start_failed(message),
            WizardEvent::StatusLoaded(status) => self.on_status(Some(status)),
            WizardEvent::StatusUnavailable => self.on_status(None),
            WizardEvent::Next => self.on_next(),
            WizardEvent::Back => self.on_back(),
            WizardEvent::Submit => self.on_submit(),
            WizardEvent::Leave => self.on_leave(),
            WizardEvent::StepSaved { step, prefill } => self.on_step_saved(step, prefill),
            WizardEvent::StepSaveFailed { step, message } => self.on_step_failed(step, message),
            WizardEvent::ReviewLoaded(snapshot) => self.on_review(Some(snapshot)),
            WizardEvent::ReviewUnavailable => self.on_review(None),
            WizardEvent::Finalized(receipt) => self.on_finalized(receipt),
            WizardEvent::FinalizeFailed(message) => self.on_finalize_failed(message),
            WizardEvent::ProfileLoaded(profile) => self.on_profile(Some(profile)),
            WizardEvent::ProfileUnavailable => self.on_profile(None),
        }
    }

    fn on_begin(&mut self, stored: Option<ApplicationSession>) -> Vec<Command> {
        // Only a fresh, idle wizard bootstraps; this also keeps a second mount
        // from creating a second backend session.
        if self.processing
            || self.application_id.is_some()
            || self.phase != Phase::Editing(Step::FIRST)
        {
            return Vec::new();
        }

        if let Some(session) = stored.filter(|s| s.belongs_to(&self.job_id)) {
            info!(
                "Resuming application {} at step {}",
                session.application_id, session.current_step
            );
            self.phase = Phase::Editing(Step::clamped(session.current_step));
            self.merge_prefill(session.prefill_data);
            self.processing = true;
            let application_id = session.application_id.clone();
            self.application_id = Some(session.application_id);
            return vec![Command::FetchStatus { application_id }];
        }

        self.processing = true;
        vec![Command::StartApplication {
            job_id: self.job_id.clone(),
        }]
    }

    fn on_started(&mut self, started: StartedApplication) -> Vec<Command> {
        if !self.processing || self.application_id.is_some() {
            debug!("Discarding late start response {}", started.application_id);
            return Vec::new();
        }
        self.processing = false;
        self.application_id = Some(started.application_id);
        self.merge_prefill(started.prefill_data);

        let step = started.target_step.map_or(Step::FIRST, Step::clamped);
        if self.phase == Phase::Left {
            // Left mid-start; the session stays resumable.
            return vec![Command::PersistSession(self.session_for(step))];
        }
        self.phase = Phase::Editing(step);

        let mut commands = vec![Command::PersistSession(self.session_for(step))];
        commands.extend(self.enter_step(step));
        commands
    }

    fn on_start_failed(&mut self, message: String) -> Vec<Command> {
        if !self.processing || self.application_id.is_some() {
            return Vec::new();
        }
        self.processing = false;
        if self.phase == Phase::Left {
            return Vec::new();
        }
        vec![Command::Notify(Notice::error(message))]
    }

    fn on_status(&mut self, status: Option<ApplicationStatus>) -> Vec<Command> {
        let Phase::Editing(local_step) = self.phase else {
            self.processing = false;
            return Vec::new();
        };
        if !self.processing {
            return Vec::new();
        }
        self.processing = false;

        let mut commands = Vec::new();
        let step = match status.and_then(|s| Step::from_number(s.current_step)) {
            Some(server_step) if server_step != local_step => {
                info!("Server reports {server_step}, local session was at {local_step}");
                self.phase = Phase::Editing(server_step);
                commands.push(Command::PersistSession(self.session_for(server_step)));
                server_step
            }
            _ => local_step,
        };
        commands.push(Command::Notify(Notice::info(format!(
            "Resuming your application at {step}"
        ))));
        commands.extend(self.enter_step(step));
        commands
    }

    fn on_next(&mut self) -> Vec<Command> {
        let Phase::Editing(step) = self.phase else {
            return Vec::new();
        };
        if self.processing {
            debug!("Ignoring Next on {step}: a save is already in flight");
            return Vec::new();
        }
        let Some(application_id) = self.application_id.clone() else {
            debug!("Ignoring Next on {step}: no application id yet");
            return Vec::new();
        };

        if let Err(errors) = validate_step(step, &self.data) {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(". ");
            return vec![Command::Notify(Notice::error(message))];
        }

        let Some(payload) = to_wire(step, &self.data) else {
            return Vec::new();
        };

        self.processing = true;
        vec![Command::SaveStep {
            application_id,
            payload,
        }]
    }

    fn on_step_saved(&mut self, step: Step, prefill: Option<Value>) -> Vec<Command> {
        if !self.processing || self.phase != Phase::Editing(step) {
            debug!("Discarding stale save result for {step}");
            return Vec::new();
        }
        self.processing = false;

        let Some(next) = step.next() else {
            return Vec::new();
        };
        self.prefill = None;
        self.merge_prefill(prefill);
        self.phase = Phase::Editing(next);
        info!("Saved {step}, moving to {next}");

        let mut commands = vec![Command::PersistSession(self.session_for(next))];
        commands.extend(self.enter_step(next));
        commands
    }

    fn on_step_failed(&mut self, step: Step, message: String) -> Vec<Command> {
        if !self.processing || self.phase != Phase::Editing(step) {
            return Vec::new();
        }
        self.processing = false;
        vec![Command::Notify(Notice::error(message))]
    }

    fn on_back(&mut self) -> Vec<Command> {
        let Phase::Editing(step) = self.phase else {
            return Vec::new();
        };
        if self.processing {
            return Vec::new();
        }
        match step.previous() {
            Some(previous) => {
                self.phase = Phase::Editing(previous);
                self.review = None;
                Vec::new()
            }
            None => self.on_leave(),
        }
    }

    fn on_leave(&mut self) -> Vec<Command> {
        if matches!(self.phase, Phase::Left | Phase::Submitted(_)) {
            return Vec::new();
        }
        self.phase = Phase::Left;
        self.review = None;
        vec![Command::Navigate(Route::JobPosting {
            job_id: self.job_id.clone(),
        })]
    }

    fn on_review(&mut self, snapshot: Option<ReviewSnapshot>) -> Vec<Command> {
        if self.phase != Phase::Editing(Step::Review) {
            return Vec::new();
        }
        self.review = Some(match snapshot {
            Some(snapshot) => Displayed::ServerSnapshot(review_view(&snapshot)),
            None => {
                debug!("Review snapshot unavailable, showing local data");
                Displayed::LocalFallback(self.data.clone())
            }
        });
        Vec::new()
    }

    fn on_submit(&mut self) -> Vec<Command> {
        if self.phase != Phase::Editing(Step::Review) || self.processing {
            return Vec::new();
        }
        let Some(application_id) = self.application_id.clone() else {
            return Vec::new();
        };
        self.processing = true;
        self.phase = Phase::Submitting;
        vec![Command::Finalize { application_id }]
    }

    fn on_finalized(&mut self, receipt: FinalizeReceipt) -> Vec<Command> {
        if self.phase != Phase::Submitting {
            return Vec::new();
        }
        if let Some(hint) = &receipt.redirect_hint {
            debug!("Finalize suggested redirect to {hint}");
        }
        self.redirect_hint = receipt.redirect_hint;
        // The finalize body may be stale; qualification is read from the profile.
        vec![Command::FetchProfile]
    }

    fn on_finalize_failed(&mut self, message: String) -> Vec<Command> {
        if self.phase != Phase::Submitting {
            return Vec::new();
        }
        self.processing = false;
        self.phase = Phase::Editing(Step::Review);
        vec![Command::Notify(Notice::error(message))]
    }

    fn on_profile(&mut self, profile: Option<UserProfile>) -> Vec<Command> {
        if self.phase != Phase::Submitting {
            return Vec::new();
        }
        let outcome = profile
            .map(|p| resolve_outcome(&p, &self.job_id))
            .unwrap_or(Outcome::UnderReview);
        info!(
            "Application for job {} submitted: {}",
            self.job_id,
            outcome.label()
        );

        self.processing = false;
        self.phase = Phase::Submitted(outcome);
        let job_id = self.job_id.clone();
        let route = match outcome {
            Outcome::InterviewEligible => Route::Interview { job_id },
            Outcome::UnderReview => Route::UnderReview { job_id },
        };
        vec![Command::ClearSession, Command::Navigate(route)]
    }

    fn enter_step(&mut self, step: Step) -> Vec<Command> {
        if step != Step::Review {
            return Vec::new();
        }
        match &self.application_id {
            Some(application_id) => {
                self.review = None;
                vec![Command::FetchReview {
                    application_id: application_id.clone(),
                }]
            }
            None => {
                self.review = Some(Displayed::LocalFallback(self.data.clone()));
                Vec::new()
            }
        }
    }

    fn merge_prefill(&mut self, prefill: Option<Value>) {
        if let Some(prefill) = prefill {
            let applied = from_wire(&prefill).apply_to(&mut self.data);
            debug!("Prefill filled {applied} field(s)");
            self.prefill = Some(prefill);
        }
    }

    fn session_for(&self, step: Step) -> ApplicationSession {
        ApplicationSession {
            application_id: self.application_id.clone().unwrap_or_default(),
            current_step: step.number(),
            prefill_data: self.prefill.clone(),
            job_id: Some(self.job_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn started(id: &str) -> WizardEvent {
        WizardEvent::Started(StartedApplication {
            application_id: id.to_string(),
            prefill_data: None,
            target_step: None,
        })
    }

    /// A machine with an application id, sitting on `step` with valid step-1 data.
    fn machine_at(step: Step) -> WizardMachine {
        let mut machine = WizardMachine::new("J1");
        machine.handle(WizardEvent::Begin { stored: None });
        machine.handle(started("app-1"));
        let personal = &mut machine.data_mut().personal_info;
        personal.first_name = "Ada".to_string();
        personal.last_name = "Lovelace".to_string();
        personal.email = "ada@x.com".to_string();
        machine.phase = Phase::Editing(step);
        machine
    }

    #[test]
    fn test_begin_without_session_starts_application() {
        let mut machine = WizardMachine::new("J1");
        let commands = machine.handle(WizardEvent::Begin { stored: None });
        assert_eq!(
            commands,
            vec![Command::StartApplication {
                job_id: "J1".to_string()
            }]
        );
        assert!(machine.is_processing());

        assert!(machine.handle(WizardEvent::Begin { stored: None }).is_empty());
    }

    #[test]
    fn test_started_persists_session_only_after_id_exists() {
        let mut machine = WizardMachine::new("J1");
        machine.handle(WizardEvent::Begin { stored: None });
        let commands = machine.handle(WizardEvent::Started(StartedApplication {
            application_id: "app-9".to_string(),
            prefill_data: Some(json!({"full_name": "Ada Lovelace"})),
            target_step: None,
        }));

        assert_eq!(machine.application_id(), Some("app-9"));
        assert_eq!(machine.data().personal_info.first_name, "Ada");
        assert_eq!(machine.data().personal_info.last_name, "Lovelace");
        match &commands[..] {
            [Command::PersistSession(session)] => {
                assert_eq!(session.application_id, "app-9");
                assert_eq!(session.current_step, 1);
                assert_eq!(session.job_id.as_deref(), Some("J1"));
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_target_step_positions_wizard() {
        let mut machine = WizardMachine::new("J1");
        machine.handle(WizardEvent::Begin { stored: None });
        machine.handle(WizardEvent::Started(StartedApplication {
            application_id: "app-1".to_string(),
            prefill_data: None,
            target_step: Some(3),
        }));
        assert_eq!(machine.current_step(), Some(Step::Questions));
    }

    #[test]
    fn test_next_without_application_id_is_noop() {
        let mut machine = WizardMachine::new("J1");
        assert!(machine.handle(WizardEvent::Next).is_empty());
        assert!(!machine.is_processing());
        assert_eq!(machine.current_step(), Some(Step::PersonalInfo));
    }

    #[test]
    fn test_next_saves_current_step() {
        let mut machine = machine_at(Step::PersonalInfo);
        let commands = machine.handle(WizardEvent::Next);
        match &commands[..] {
            [Command::SaveStep {
                application_id,
                payload,
            }] => {
                assert_eq!(application_id, "app-1");
                assert_eq!(payload.step(), Step::PersonalInfo);
            }
            other => panic!("unexpected commands {other:?}"),
        }
        assert!(machine.is_processing());
        assert_eq!(machine.current_step(), Some(Step::PersonalInfo));
    }

    #[test]
    fn test_duplicate_next_is_dropped() {
        let mut machine = machine_at(Step::PersonalInfo);
        assert_eq!(machine.handle(WizardEvent::Next).len(), 1);
        assert!(machine.handle(WizardEvent::Next).is_empty());
    }

    #[test]
    fn test_invalid_step_notifies_without_saving() {
        let mut machine = machine_at(Step::PersonalInfo);
        machine.data_mut().personal_info.email = "nope".to_string();
        let commands = machine.handle(WizardEvent::Next);
        assert!(matches!(
            &commands[..],
            [Command::Notify(Notice { level: NoticeLevel::Error, .. })]
        ));
        assert!(!machine.is_processing());
    }

    #[test]
    fn test_successful_save_advances_and_merges_prefill() {
        let mut machine = machine_at(Step::PersonalInfo);
        machine.handle(WizardEvent::Next);
        let commands = machine.handle(WizardEvent::StepSaved {
            step: Step::PersonalInfo,
            prefill: Some(json!({"technical_skills": "Python"})),
        });

        assert_eq!(machine.current_step(), Some(Step::Experience));
        assert_eq!(machine.data().experience.technical_skills, "Python");
        assert!(!machine.is_processing());
        match &commands[..] {
            [Command::PersistSession(session)] => {
                assert_eq!(session.current_step, 2);
                assert_eq!(
                    session.prefill_data,
                    Some(json!({"technical_skills": "Python"}))
                );
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_failed_save_keeps_step_and_data() {
        let mut machine = machine_at(Step::Experience);
        machine.data_mut().experience.summary = "Poet of science".to_string();
        let before = machine.data().clone();

        machine.handle(WizardEvent::Next);
        let commands = machine.handle(WizardEvent::StepSaveFailed {
            step: Step::Experience,
            message: "Could not reach the server".to_string(),
        });

        assert_eq!(
            commands,
            vec![Command::Notify(Notice::error("Could not reach the server"))]
        );
        assert_eq!(machine.current_step(), Some(Step::Experience));
        assert_eq!(machine.data(), &before);
        assert!(!machine.is_processing());

        // Retry is allowed.
        assert_eq!(machine.handle(WizardEvent::Next).len(), 1);
    }

    #[test]
    fn test_back_keeps_data_and_makes_no_calls() {
        let mut machine = machine_at(Step::Questions);
        machine.data_mut().questions.availability = "2 weeks".to_string();
        assert!(machine.handle(WizardEvent::Back).is_empty());
        assert_eq!(machine.current_step(), Some(Step::Experience));
        assert_eq!(machine.data().questions.availability, "2 weeks");
    }

    #[test]
    fn test_back_from_first_step_leaves_to_job_posting() {
        let mut machine = machine_at(Step::PersonalInfo);
        let commands = machine.handle(WizardEvent::Back);
        assert_eq!(
            commands,
            vec![Command::Navigate(Route::JobPosting {
                job_id: "J1".to_string()
            })]
        );
        assert_eq!(machine.phase(), Phase::Left);
    }

    #[test]
    fn test_back_is_ignored_while_saving() {
        let mut machine = machine_at(Step::Questions);
        machine.handle(WizardEvent::Next);
        assert!(machine.handle(WizardEvent::Back).is_empty());
        assert_eq!(machine.current_step(), Some(Step::Questions));
    }

    #[test]
    fn test_late_save_after_leaving_is_discarded() {
        let mut machine = machine_at(Step::Experience);
        machine.handle(WizardEvent::Next);
        machine.handle(WizardEvent::Leave);
        let commands = machine.handle(WizardEvent::StepSaved {
            step: Step::Experience,
            prefill: Some(json!({"salary_min": "1"})),
        });
        assert!(commands.is_empty());
        assert_eq!(machine.phase(), Phase::Left);
        assert_eq!(machine.data().questions.salary_min, "");
    }

    #[test]
    fn test_entering_review_fetches_snapshot() {
        let mut machine = machine_at(Step::Identity);
        machine.handle(WizardEvent::Next);
        let commands = machine.handle(WizardEvent::StepSaved {
            step: Step::Identity,
            prefill: None,
        });
        assert_eq!(machine.current_step(), Some(Step::Review));
        assert!(commands.contains(&Command::FetchReview {
            application_id: "app-1".to_string()
        }));
    }

    #[test]
    fn test_review_falls_back_to_local_data() {
        let mut machine = machine_at(Step::Review);
        machine.handle(WizardEvent::ReviewUnavailable);
        match machine.review() {
            Some(Displayed::LocalFallback(data)) => {
                assert_eq!(data.personal_info.first_name, "Ada")
            }
            other => panic!("expected local fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_review_uses_server_snapshot() {
        let mut machine = machine_at(Step::Review);
        let snapshot: ReviewSnapshot = serde_json::from_value(json!({
            "personal_information": {"first_name": "Augusta"}
        }))
        .unwrap();
        machine.handle(WizardEvent::ReviewLoaded(snapshot));
        match machine.review() {
            Some(Displayed::ServerSnapshot(view)) => {
                assert_eq!(view.personal_info.first_name, "Augusta")
            }
            other => panic!("expected server snapshot, got {other:?}"),
        }
    }

    #[test]
    fn test_next_on_review_does_nothing() {
        let mut machine = machine_at(Step::Review);
        assert!(machine.handle(WizardEvent::Next).is_empty());
    }

    #[test]
    fn test_submit_flow_to_interview() {
        let mut machine = machine_at(Step::Review);
        assert_eq!(
            machine.handle(WizardEvent::Submit),
            vec![Command::Finalize {
                application_id: "app-1".to_string()
            }]
        );
        assert_eq!(machine.phase(), Phase::Submitting);
        assert!(machine.handle(WizardEvent::Submit).is_empty());

        assert_eq!(
            machine.handle(WizardEvent::Finalized(FinalizeReceipt::default())),
            vec![Command::FetchProfile]
        );

        let profile: UserProfile = serde_json::from_value(json!({
            "applications": [{"jobId": "J1", "qualified": true, "status": "QUALIFIED"}]
        }))
        .unwrap();
        let commands = machine.handle(WizardEvent::ProfileLoaded(profile));
        assert_eq!(
            commands,
            vec![
                Command::ClearSession,
                Command::Navigate(Route::Interview {
                    job_id: "J1".to_string()
                })
            ]
        );
        assert_eq!(machine.outcome(), Some(Outcome::InterviewEligible));
    }

    #[test]
    fn test_profile_failure_resolves_under_review() {
        let mut machine = machine_at(Step::Review);
        machine.handle(WizardEvent::Submit);
        machine.handle(WizardEvent::Finalized(FinalizeReceipt::default()));
        machine.handle(WizardEvent::ProfileUnavailable);
        assert_eq!(machine.outcome(), Some(Outcome::UnderReview));
    }

    #[test]
    fn test_finalize_failure_returns_to_review() {
        let mut machine = machine_at(Step::Review);
        machine.handle(WizardEvent::Submit);
        let commands = machine.handle(WizardEvent::FinalizeFailed("Try again".to_string()));
        assert_eq!(commands, vec![Command::Notify(Notice::error("Try again"))]);
        assert_eq!(machine.phase(), Phase::Editing(Step::Review));
        assert!(!machine.is_processing());
    }

    #[test]
    fn test_resume_stored_session_checks_status() {
        let mut machine = WizardMachine::new("J1");
        let commands = machine.handle(WizardEvent::Begin {
            stored: Some(ApplicationSession {
                application_id: "app-3".to_string(),
                current_step: 4,
                prefill_data: Some(json!({"previous_alias": "A. A. L."})),
                job_id: Some("J1".to_string()),
            }),
        });
        assert_eq!(
            commands,
            vec![Command::FetchStatus {
                application_id: "app-3".to_string()
            }]
        );
        assert_eq!(machine.current_step(), Some(Step::Disclosures));
        assert_eq!(machine.data().disclosures.previous_alias, "A. A. L.");

        let commands = machine.handle(WizardEvent::StatusLoaded(ApplicationStatus {
            status: "in_progress".to_string(),
            current_step: 3,
            total_steps: 6,
        }));
        assert_eq!(machine.current_step(), Some(Step::Questions));
        match &commands[..] {
            [Command::PersistSession(session), Command::Notify(notice)] => {
                assert_eq!(session.current_step, 3);
                assert_eq!(notice.level, NoticeLevel::Info);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_status_failure_keeps_local_step() {
        let mut machine = WizardMachine::new("J1");
        machine.handle(WizardEvent::Begin {
            stored: Some(ApplicationSession {
                application_id: "app-3".to_string(),
                current_step: 6,
                prefill_data: None,
                job_id: None,
            }),
        });
        let commands = machine.handle(WizardEvent::StatusUnavailable);
        assert_eq!(machine.current_step(), Some(Step::Review));
        assert_eq!(
            commands,
            vec![
                Command::Notify(Notice::info(
                    "Resuming your application at step 6 (Review & submit)"
                )),
                Command::FetchReview {
                    application_id: "app-3".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_session_for_other_job_is_not_resumed() {
        let mut machine = WizardMachine::new("J2");
        let commands = machine.handle(WizardEvent::Begin {
            stored: Some(ApplicationSession {
                application_id: "app-3".to_string(),
                current_step: 2,
                prefill_data: None,
                job_id: Some("J1".to_string()),
            }),
        });
        assert_eq!(
            commands,
            vec![Command::StartApplication {
                job_id: "J2".to_string()
            }]
        );
    }

    #[test]
    fn test_route_paths() {
        let route = Route::Interview {
            job_id: "J1".to_string(),
        };
        assert_eq!(route.path(), "/interview/J1");
    }
}
