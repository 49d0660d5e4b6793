pub mod command;
pub mod logfile;
pub mod sink;

pub use command::{run_with_sinks, CommandRunner, CommandSpec};
pub use logfile::{rotate_if_oversized, ROTATION_MARKER};
pub use sink::{ConsoleSink, LineSink, LogSink};
