//! Terminal output for the launcher.
//!
//! The launcher prints nothing on success; the build's own output goes
//! straight through. Only fatal diagnostics are written here.

use std::io::Write;

use owo_colors::{OwoColorize, Stream};

/// Label that prefixes every fatal diagnostic.
pub const FATAL_LABEL: &str = "XED build error:";

/// Format `message` as a blank-line delimited diagnostic block.
pub fn format_fatal(label: &str, message: &str) -> String {
  format!("\n\n{} {}\n\n", label, message)
}

/// Write the diagnostic to stderr and exit with code 1.
pub fn fatal(message: &str) -> ! {
  let label = FATAL_LABEL.if_supports_color(Stream::Stderr, |s| s.red().bold().to_string());
  report(&format_fatal(&label.to_string(), message));
  std::process::exit(1);
}

/// Write a diagnostic produced elsewhere (e.g. the orchestrator's handler) and exit with `code`.
pub fn terminate(code: i32, diagnostic: &str) -> ! {
  report(&format!("\n\n{}\n\n", diagnostic));
  std::process::exit(code);
}

fn report(text: &str) {
  let mut stderr = std::io::stderr().lock();
  // Nothing left to report to if stderr itself is gone.
  let _ = stderr.write_all(text.as_bytes());
  let _ = stderr.flush();
}
