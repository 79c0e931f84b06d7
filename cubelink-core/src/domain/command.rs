//! Command relay requests

use std::borrow::Cow;
use std::fmt;

/// Program token remapped to a versioned binary when a version is configured
const DOCKER_PROGRAM: &str = "docker";

/// A single command line received on the relay endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub program: String,
    pub args: Vec<String>,
}

impl ExecutionRequest {
    /// Splits a command line on whitespace into program and arguments
    ///
    /// Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().map(str::to_string);
        let program = tokens.next()?;
        Some(Self {
            program,
            args: tokens.collect(),
        })
    }

    /// Remaps a literal `docker` program to `docker-<version>`
    ///
    /// Without a configured version the request is left untouched.
    pub fn rewrite_docker(mut self, version: Option<&str>) -> Self {
        if let Some(version) = version {
            if self.program == DOCKER_PROGRAM {
                self.program = format!("{}-{}", DOCKER_PROGRAM, version);
            }
        }
        self
    }
}

impl fmt::Display for ExecutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Applies one form-decoding pass to an already decoded `cmd` value
///
/// Callers escape the command twice, so the HTTP layer's decode leaves one
/// layer behind. `+` becomes a space before percent-decoding; text that is
/// not valid UTF-8 once decoded is returned unchanged.
pub fn decode_command(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['+', '%']) {
        return Cow::Borrowed(raw);
    }
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Borrowed(raw),
    }
}
