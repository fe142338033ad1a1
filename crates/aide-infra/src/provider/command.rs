//! Captures stdout of a read-only command (a calendar CLI, `task list`...).

use std::process::Stdio;
use std::time::Duration;

use aide_core::context::ContextProvider;
use aide_types::error::ProviderError;
use tokio::process::Command;

pub struct CommandProvider {
    name: String,
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandProvider {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
            timeout,
        }
    }
}

impl ContextProvider for CommandProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, ProviderError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| ProviderError::Command(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, timeout: Duration) -> CommandProvider {
        CommandProvider::new("cmd", "sh", vec!["-c".to_string(), script.to_string()], timeout)
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let provider = sh("echo standup at 10", Duration::from_secs(5));
        assert_eq!(provider.fetch().await.unwrap(), "standup at 10\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_error() {
        let provider = sh("echo broken >&2; exit 3", Duration::from_secs(5));
        let err = provider.fetch().await.unwrap_err();
        assert!(matches!(err, ProviderError::Command(ref m) if m.contains("broken")));
    }

    #[tokio::test]
    async fn test_timeout() {
        let provider = sh("sleep 5", Duration::from_millis(100));
        assert!(matches!(provider.fetch().await, Err(ProviderError::Timeout(100))));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let provider = CommandProvider::new("cmd", "definitely-not-a-real-binary-aide", vec![], Duration::from_secs(1));
        assert!(matches!(provider.fetch().await, Err(ProviderError::Command(_))));
    }
}
