pub mod engine;
pub mod retry;

pub use engine::{
    find_excluded, plan_removals, CleanOutcome, CleanPlan, CleanReport, Cleaner, Execution,
    PendingRemoval, RemovalFailure, RemovalKind,
};
pub use retry::RetryPolicy;
