//! mfile-lib: bootstrap logic for the XED build
//!
//! This crate decides how a build is launched before any compilation runs:
//! - `version`: the interpreter running the build must be new enough
//! - `locate`: the `mbuild` build-support package must be importable
//! - `finder`: asks the interpreter whether a module imports
//! - `dispatch`: hands the request to the `xed_mbuild` orchestrator
//! - `package`: optionally builds the `xed` Python extension afterwards
//! - `entry`: sequences the above for one process invocation

pub mod config;
pub mod consts;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod finder;
pub mod locate;
pub mod orchestrator;
pub mod package;
pub mod platform;
pub mod request;
pub mod search;
pub mod version;

#[cfg(test)]
pub mod util;

pub use config::LaunchConfig;
pub use entry::{Collaborators, Completion, run};
pub use error::BootError;
pub use request::BuildRequest;
