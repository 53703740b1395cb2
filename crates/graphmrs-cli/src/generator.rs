//! External surface-text generator.
//!
//! The generator is a grammar-based program that reads one SimpleMRS per line
//! on stdin and prints realizations on stdout (ACE with `-e` behaves this
//! way). One subprocess per representation; there is no timeout.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::config::GeneratorConfig;

pub trait Generator {
    /// Surface strings for one compact SimpleMRS.
    fn generate(&self, mrs: &str) -> Result<Vec<String>>;
}

pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

impl Generator for CommandGenerator {
    fn generate(&self, mrs: &str) -> Result<Vec<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start generator `{}`", self.program))?;

        {
            let stdin = child.stdin.as_mut().context("generator stdin unavailable")?;
            stdin.write_all(mrs.as_bytes())?;
            stdin.write_all(b"\n")?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            bail!(
                "generator `{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(program = %self.program, stderr = %stderr.trim(), "generator diagnostics");
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}
