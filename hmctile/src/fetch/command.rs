//! External command abstraction for testability

use std::process::Command;

use tracing::debug;

use super::types::FetchError;

/// Runs an external program and returns its standard output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>, FetchError>;
}

/// [`CommandRunner`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>, FetchError> {
        debug!(program, args = %args.join(" "), "Running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| FetchError::Command(format!("failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Command(format!(
                "{} {} exited with {}: {}",
                program,
                args.first().map(String::as_str).unwrap_or_default(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}
