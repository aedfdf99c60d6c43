//! The external test runner and formatter.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::ExecError;

/// The pytest-style runner executing the instructor suite.
///
/// The suite is invoked as `<command> <tests> --solution <file>`: the tests
/// receive the submission under grading through the `--solution` option and
/// record their deductions inside it.
#[derive(Debug, Clone)]
pub struct TestRunner {
    command: String,
}

/// What a test run produced.
#[derive(Debug, Clone)]
pub struct RunnerOutput {
    /// Whether the process exited successfully.
    pub success: bool,
    /// The exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl TestRunner {
    /// A runner using `command` to execute the suite.
    pub fn new(command: impl Into<String>) -> TestRunner {
        TestRunner {
            command: command.into(),
        }
    }

    /// Run the suite in `tests` against the `solution` file, capturing the
    /// output.
    ///
    /// A failing exit status is not an error: it is reported through
    /// [`RunnerOutput::success`] and the caller decides how to score it.
    pub fn run(&self, tests: &Path, solution: &Path) -> Result<RunnerOutput, ExecError> {
        debug!(
            "running {} {} --solution {}",
            self.command,
            tests.display(),
            solution.display()
        );
        let output = Command::new(&self.command)
            .arg(tests)
            .arg("--solution")
            .arg(solution)
            .output()
            .map_err(|source| ExecError::Spawn {
                command: self.command.clone(),
                source,
            })?;
        Ok(RunnerOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl Default for TestRunner {
    fn default() -> TestRunner {
        TestRunner::new("py.test")
    }
}

/// The formatter normalizing a submission before grading.
#[derive(Debug, Clone)]
pub struct Formatter {
    command: String,
}

impl Formatter {
    /// A formatter invoking `command` on the file to normalize.
    pub fn new(command: impl Into<String>) -> Formatter {
        Formatter {
            command: command.into(),
        }
    }

    /// Reformat `path` in place. A failing formatter is an error, since the
    /// file may have been left in an inconsistent state.
    pub fn format(&self, path: &Path) -> Result<(), ExecError> {
        debug!("running {} {}", self.command, path.display());
        let output = Command::new(&self.command)
            .arg(path)
            .output()
            .map_err(|source| ExecError::Spawn {
                command: self.command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ExecError::Format {
                path: path.into(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

impl Default for Formatter {
    fn default() -> Formatter {
        Formatter::new("black")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_runner_is_a_spawn_error() {
        let runner = TestRunner::new("definitely-not-a-real-test-runner");
        let err = runner
            .run(Path::new("tests.py"), Path::new("solution.py"))
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_is_reported() {
        let ok = TestRunner::new("true")
            .run(Path::new("tests.py"), Path::new("solution.py"))
            .unwrap();
        assert!(ok.success);
        assert_eq!(ok.code, Some(0));

        let failed = TestRunner::new("false")
            .run(Path::new("tests.py"), Path::new("solution.py"))
            .unwrap();
        assert!(!failed.success);
    }

    #[cfg(unix)]
    #[test]
    fn failing_formatter_is_an_error() {
        let err = Formatter::new("false")
            .format(Path::new("solution.py"))
            .unwrap_err();
        assert!(matches!(err, ExecError::Format { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn successful_formatter_is_ok() {
        Formatter::new("true").format(Path::new("solution.py")).unwrap();
    }
}
