//! Uploader command line and plain (non-interactive) invocation.

use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info, warn};

use crate::error::UploaderError;

/// Jar looked up when none is given.
pub const DEFAULT_JAR: &str = "./sg-upload-v2-latest.jar";

/// JVM property naming the uploader configuration override file.
const CONFIG_PROPERTY: &str = "-Dmicronaut.config.files=";

/// Flag whose following argument is never echoed.
const PASSWORD_FLAG: &str = "-p";

/// How to launch the uploader: a program plus leading arguments that every
/// call shares. Subcommand arguments are appended per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderCommand {
    program: String,
    base_args: Vec<String>,
    debug: bool,
}

impl UploaderCommand {
    /// `java [-Dmicronaut.config.files=<config>] -jar <jar>`.
    ///
    /// Fails when the jar or the configuration file does not exist.
    pub fn java(jar: &Path, config: Option<&Path>) -> Result<Self, UploaderError> {
        if !jar.exists() {
            return Err(UploaderError::JarNotFound {
                path: jar.to_path_buf(),
            });
        }
        let mut base_args = Vec::new();
        if let Some(config) = config {
            if !config.exists() {
                return Err(UploaderError::ConfigNotFound {
                    path: config.to_path_buf(),
                });
            }
            base_args.push(format!("{CONFIG_PROPERTY}{}", config.display()));
        }
        base_args.push("-jar".to_string());
        base_args.push(jar.display().to_string());
        Ok(Self::from_parts("java", base_args))
    }

    /// Any launcher, e.g. a wrapper script.
    pub fn from_parts(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
            debug: false,
        }
    }

    /// Echo every invocation at info level instead of debug.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn base_args(&self) -> &[String] {
        &self.base_args
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Process builder for one call.
    pub fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.base_args).args(args);
        command
    }

    /// Printable command line with the password masked.
    pub fn display(&self, args: &[String]) -> String {
        let mut parts = vec![self.program.clone()];
        let mut mask_next = false;
        for arg in self.base_args.iter().chain(args) {
            if mask_next {
                parts.push("****".to_string());
            } else {
                parts.push(arg.clone());
            }
            mask_next = arg == PASSWORD_FLAG;
        }
        parts.join(" ")
    }

    pub(crate) fn log_invocation(&self, args: &[String]) {
        let line = self.display(args);
        if self.debug {
            info!(command = %line, "running uploader");
        } else {
            debug!(command = %line, "running uploader");
        }
    }

    /// Run one call to completion, capturing its output.
    pub fn run(&self, args: &[String]) -> Result<CommandOutput, UploaderError> {
        self.log_invocation(args);
        let output = self
            .command(args)
            .output()
            .map_err(|source| UploaderError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let output = CommandOutput::from(output);
        output.log();
        Ok(output)
    }
}

/// Captured result of an uploader call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` when terminated by a signal.
    pub status: Option<i32>,
}

impl CommandOutput {
    /// Log non-empty stdout and stderr.
    pub fn log(&self) {
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            info!(target: "ade_uploader::output", "{stdout}");
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            warn!(target: "ade_uploader::output", "{stderr}");
        }
        if let Some(code) = self.status.filter(|code| *code != 0) {
            warn!(exit_code = code, "uploader exited with failure status");
        }
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn config_property_precedes_jar() {
        let dir = TempDir::new().unwrap();
        let jar = dir.path().join("uploader.jar");
        let config = dir.path().join("uploader.yml");
        std::fs::write(&jar, "").unwrap();
        std::fs::write(&config, "").unwrap();

        let command = UploaderCommand::java(&jar, Some(&config)).unwrap();
        assert_eq!(command.program(), "java");
        assert_eq!(
            command.base_args(),
            &[
                format!("-Dmicronaut.config.files={}", config.display()),
                "-jar".to_string(),
                jar.display().to_string(),
            ]
        );
    }

    #[test]
    fn missing_jar_and_config_are_reported() {
        let dir = TempDir::new().unwrap();
        let jar = dir.path().join("uploader.jar");
        let err = UploaderCommand::java(&jar, None).unwrap_err();
        assert!(matches!(err, UploaderError::JarNotFound { .. }));

        std::fs::write(&jar, "").unwrap();
        let err = UploaderCommand::java(&jar, Some(&dir.path().join("absent.yml"))).unwrap_err();
        assert!(matches!(err, UploaderError::ConfigNotFound { .. }));
    }

    #[test]
    fn display_masks_password() {
        let command = UploaderCommand::from_parts("java", args(&["-jar", "u.jar"]));
        let line = command.display(&args(&["patient", "-u", "alice", "-p", "s3cret"]));
        assert_eq!(line, "java -jar u.jar patient -u alice -p ****");
    }
}
