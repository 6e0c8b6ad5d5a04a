//! Deferred-init entry points: manifest-declared shell commands run in the
//! plugin's install directory.

use std::{path::PathBuf, time::Duration};

use {tokio::process::Command, tracing::debug};

use crate::{Error, Result, manifest::InitSpec};

/// Executable handle for one plugin's deferred initialization.
#[derive(Debug, Clone)]
pub struct InitHook {
    command: String,
    timeout: Duration,
    workdir: PathBuf,
}

impl InitHook {
    pub fn new(spec: InitSpec, workdir: PathBuf) -> Self {
        Self {
            command: spec.command,
            timeout: Duration::from_secs(spec.timeout),
            workdir,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the command to completion. Non-zero exit and timeouts are errors;
    /// callers decide whether to isolate them.
    pub async fn run(&self) -> Result<()> {
        debug!(command = %self.command, dir = %self.workdir.display(), "spawning init command");

        let child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.workdir)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| Error::init_failed(format!("spawn '{}': {e}", self.command)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::init_failed(format!("timed out after {:?}", self.timeout)))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::init_failed(format!(
                "exit {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }
        Ok(())
    }
}
