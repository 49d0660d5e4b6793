//! # devcycle
//!
//! Local developer-workflow CLI for an Electron/SvelteKit project.
//!
//! devcycle wraps the project's npm commands and manages the dev-server
//! lifecycle around them:
//!
//! - **Tree**: annotated file tree with per-language line statistics
//! - **Clean**: prune-aware removal of build artifacts and dependency folders,
//!   smallest files first, with bounded retry
//! - **Stop**: forced termination of lingering dev servers and PID marker cleanup
//! - **Install / Build / Dev**: npm commands streamed to the console and `build.log`,
//!   with post-build artifact verification
//! - **Init**: stop → install → build → dev in one command, Ctrl-C safe

pub mod cleaner;
pub mod cli;
pub mod common;
pub mod lifecycle;
pub mod runner;
pub mod scanner;
pub mod server;
