use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::api_client::{ApplicationApi, HttpApplicationApi};
use crate::config::Config;
use crate::models::application::ApplicationData;
use crate::models::review::Displayed;
use crate::session_store::{FileSessionStore, SessionStore};
use crate::wizard::{ApplicationWizard, Notice, NoticeLevel, Phase, Route, WizardHost};

#[derive(Parser, Debug)]
#[command(
    name = "applicant",
    about = "Fill in and submit a job application from the command line",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk the application wizard for a job, resuming a stored session if present
    Apply(ApplyArgs),
    /// Show the stored session and the backend's view of its progress
    Status,
    /// Forget the stored session
    Reset,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Job posting to apply for
    #[arg(long)]
    job: String,
    /// JSON file with the candidate's answers, in the wizard's form shape
    #[arg(long)]
    answers: Option<PathBuf>,
    /// Submit once the review step is reached
    #[arg(long)]
    submit: bool,
}

/// Prints notices and navigation to the terminal.
struct ConsoleHost;

impl WizardHost for ConsoleHost {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
        }
    }

    fn navigate(&self, route: &Route) {
        let message = match route {
            Route::JobPosting { .. } => "Returned to the job posting",
            Route::Interview { .. } => "You qualify for an interview",
            Route::UnderReview { .. } => "Your application is under review",
        };
        println!("{message} ({})", route.path());
    }
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_path));

    match cli.command {
        Command::Apply(args) => apply(args, &config, store).await,
        Command::Status => status(&config, store.as_ref()).await,
        Command::Reset => {
            store.clear()?;
            println!("Cleared stored session at {}", config.session_path.display());
            Ok(())
        }
    }
}

fn api(config: &Config) -> Result<HttpApplicationApi> {
    Ok(HttpApplicationApi::new(&config.api_url, config.http_timeout)?
        .with_read_retries(config.read_retries))
}

fn load_answers(path: &Path) -> Result<ApplicationData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read answers from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid answers document", path.display()))
}

async fn apply(args: ApplyArgs, config: &Config, store: Arc<dyn SessionStore>) -> Result<()> {
    let wizard = ApplicationWizard::new(
        args.job.clone(),
        Arc::new(api(config)?),
        store,
        Arc::new(ConsoleHost),
    );

    if let Some(path) = &args.answers {
        let answers = load_answers(path)?;
        wizard.edit(|data| *data = answers);
    }

    wizard.begin().await;

    loop {
        let state = wizard.snapshot();
        let Some(step) = state.current_step() else {
            return Ok(());
        };
        if state.application_id().is_none() {
            bail!("Could not start an application for job {}", args.job);
        }
        if step.next().is_none() {
            break;
        }

        println!("Saving {step}...");
        wizard.next().await;
        if wizard.snapshot().current_step() == Some(step) {
            bail!("Stopped at {step}; fix the answers and run again to resume");
        }
    }

    let state = wizard.snapshot();
    match state.review() {
        Some(Displayed::ServerSnapshot(view)) => {
            let personal = &view.personal_info;
            println!(
                "Review: {} {} <{}>",
                personal.first_name, personal.last_name, personal.email
            );
            if let Some(position) = &view.position {
                println!("Position: {} at {}", position.title, position.company);
            }
            for document in &view.documents {
                println!("Attached: {} ({})", document.name, document.kind);
            }
        }
        Some(Displayed::LocalFallback(data)) => {
            println!("Review (server snapshot unavailable, showing local answers):");
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        None => {}
    }

    if !args.submit {
        println!("Run again with --submit to send the application");
        return Ok(());
    }

    wizard.submit().await;
    match wizard.snapshot().phase() {
        Phase::Submitted(outcome) => {
            info!("Application for {} finished as {}", args.job, outcome.label());
            Ok(())
        }
        _ => bail!("The application was not submitted"),
    }
}

async fn status(config: &Config, store: &dyn SessionStore) -> Result<()> {
    let Some(session) = store.load()? else {
        println!("No stored session");
        return Ok(());
    };
    println!(
        "Stored session {} for job {} at step {}",
        session.application_id,
        session.job_id.as_deref().unwrap_or("(unknown)"),
        session.current_step
    );

    match api(config)?.application_status(&session.application_id).await {
        Ok(status) => println!(
            "Backend: {} (step {} of {})",
            status.status, status.current_step, status.total_steps
        ),
        Err(e) => eprintln!("Backend status unavailable: {}", e.user_facing().1),
    }
    Ok(())
}
