pub mod controller;
pub mod terminator;

pub use controller::{ServerController, StopReport};
pub use terminator::{
    platform_terminator, Capability, PkillTerminator, ProcessTerminator, TaskkillTerminator,
    TerminateOutcome,
};
