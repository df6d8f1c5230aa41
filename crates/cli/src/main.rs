use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mfile_lib::finder::InterpreterFinder;
use mfile_lib::orchestrator::{InterpreterOrchestrator, Termination};
use mfile_lib::package::SetuptoolsPackager;
use mfile_lib::platform::Os;
use mfile_lib::version::InterpreterProbe;
use mfile_lib::{BootError, BuildRequest, Collaborators, LaunchConfig, run};

mod output;

/// Bootstraps the XED build: checks the interpreter, makes `mbuild`
/// importable and runs the `xed_mbuild` orchestrator.
///
/// Every argument is forwarded to the orchestrator unchanged, except
/// `pymodule`, which additionally packages the `xed` Python extension.
#[derive(Parser)]
#[command(name = "mfile", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
  /// Arguments for the build orchestrator
  #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
  args: Vec<String>,
}

fn main() {
  // Initialize logging
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let program = std::env::args_os()
    .next()
    .map(|arg| arg.to_string_lossy().into_owned())
    .unwrap_or_else(|| "mfile".to_string());
  let cli = Cli::parse();

  let code = match launch(program, cli.args) {
    Ok(code) => code,
    Err(err) => match Failure::from(err) {
      Failure::Terminate(termination) => output::terminate(termination.code, &termination.diagnostic),
      Failure::Fatal(message) => output::fatal(&message),
    },
  };
  std::process::exit(code);
}

/// How a failed launch ends the process.
#[derive(Debug, PartialEq, Eq)]
enum Failure {
  /// The orchestrator's handler chose the code and diagnostic.
  Terminate(Termination),
  /// Everything else: the fatal diagnostic with exit code 1.
  Fatal(String),
}

impl From<anyhow::Error> for Failure {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<BootError>() {
      Ok(BootError::Orchestrator(termination)) => Self::Terminate(termination),
      // Launcher errors already carry their cause in the message.
      Ok(boot) => Self::Fatal(boot.to_string()),
      Err(other) => Self::Fatal(format!("{:#}", other)),
    }
  }
}

fn launch(program: String, args: Vec<String>) -> Result<i32> {
  let config = LaunchConfig::from_env(&program).context("failed to read launch configuration")?;
  debug!(script = %config.script.display(), interpreter = %config.interpreter.display(), "launching");

  let runtime = InterpreterProbe::new(&config.interpreter);
  let finder = InterpreterFinder::new(&config.interpreter, &config.cwd);
  let orchestrator = InterpreterOrchestrator::new(&config.interpreter, &config.cwd);
  let packager = SetuptoolsPackager::new(&config.interpreter, &config.cwd);

  let mut request = Vec::with_capacity(args.len() + 1);
  request.push(program);
  request.extend(args);

  let completion = run(
    &config,
    BuildRequest::new(request),
    &Collaborators {
      runtime: &runtime,
      finder: &finder,
      orchestrator: &orchestrator,
      packager: &packager,
      os: Os::current(),
    },
  )?;
  Ok(completion.exit_code())
}
