//! Top-level launch sequence.
//!
//! `start -> argument rewrite -> dispatch -> (exit | package) -> end`

use tracing::{debug, info};

use crate::config::LaunchConfig;
use crate::dispatch::dispatch;
use crate::error::BootError;
use crate::finder::ModuleFinder;
use crate::orchestrator::Orchestrator;
use crate::package::{PackageSpec, Packager};
use crate::platform::Os;
use crate::request::BuildRequest;
use crate::version::RuntimeProbe;

/// External collaborators the sequence drives.
pub struct Collaborators<'a> {
  pub runtime: &'a dyn RuntimeProbe,
  /// Answers whether `mbuild` already imports.
  pub finder: &'a dyn ModuleFinder,
  pub orchestrator: &'a dyn Orchestrator,
  pub packager: &'a dyn Packager,
  /// Host family used to shape the extension package.
  pub os: Os,
}

/// How a launch ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
  /// The orchestrator returned a non-zero code; the process exits with it.
  Exit(i32),
  /// The build succeeded; `packaged` tells whether the extension was built too.
  Finished { packaged: bool },
}

impl Completion {
  pub fn exit_code(self) -> i32 {
    match self {
      Self::Exit(code) => code,
      Self::Finished { .. } => 0,
    }
  }
}

pub fn run(config: &LaunchConfig, mut request: BuildRequest, with: &Collaborators<'_>) -> Result<Completion, BootError> {
  let package = request.take_package_request();
  debug!(package, args = ?request.args(), "arguments prepared");

  let dispatched = dispatch(config, &request, with.runtime, with.finder, with.orchestrator)?;
  if !dispatched.status.is_success() {
    info!(code = dispatched.status.code(), "build exited with non-zero status");
    return Ok(Completion::Exit(dispatched.status.code()));
  }

  if package {
    let spec = PackageSpec::xed(with.os);
    with.packager.package(&spec, &dispatched.search)?;
  }

  Ok(Completion::Finished { packaged: package })
}
