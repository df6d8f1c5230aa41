//! The argument list forwarded to the orchestrator.

use crate::consts::{PACKAGE_TOKEN, PIC_FLAG};

/// Process arguments, element 0 being the invoking program path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequest {
  args: Vec<String>,
}

impl BuildRequest {
  pub fn new(args: Vec<String>) -> Self {
    Self { args }
  }

  pub fn args(&self) -> &[String] {
    &self.args
  }

  /// Consume the packaging token if present.
  ///
  /// The first occurrence after the program path is removed and the
  /// position-independent-code flag appended. Returns whether packaging was
  /// requested.
  pub fn take_package_request(&mut self) -> bool {
    let Some(index) = self.args.iter().skip(1).position(|arg| arg == PACKAGE_TOKEN) else {
      return false;
    };
    self.args.remove(index + 1);
    self.args.push(PIC_FLAG.to_string());
    true
  }
}

impl From<Vec<String>> for BuildRequest {
  fn from(args: Vec<String>) -> Self {
    Self::new(args)
  }
}
