pub mod orchestrator;

pub use orchestrator::{BuildReport, InstallOutcome, Orchestrator, Stage};
