//! The six-step application wizard.
//!
//! [`machine`] holds the pure transition logic; [`driver`] performs the
//! side effects it asks for.

pub mod driver;
pub mod machine;
pub mod validation;

pub use driver::{ApplicationWizard, RecordingHost, WizardHost};
pub use machine::{Command, Notice, NoticeLevel, Phase, Route, WizardEvent, WizardMachine};
pub use validation::{validate_step, ValidationError};
