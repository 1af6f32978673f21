// Share command adapter - Hands the exported file to a configured program

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Share adapter that runs `<command> <artifact path>`
pub struct CommandShareAdapter {
    command: Option<String>,
}

impl CommandShareAdapter {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[async_trait]
impl SharePort for CommandShareAdapter {
    async fn share(&self, artifact: &ArtifactRef) -> Result<(), DomainError> {
        let program = self
            .command
            .as_deref()
            .ok_or_else(|| DomainError::ShareFail("no share command configured".to_string()))?;

        debug!(program, artifact = %artifact, "starting share command");
        let status = Command::new(program)
            .arg(artifact.path())
            .status()
            .await
            .map_err(|e| DomainError::ShareFail(format!("Failed to start {}: {}", program, e)))?;

        if !status.success() {
            return Err(DomainError::ShareFail(format!(
                "{} exited with {}",
                program, status
            )));
        }

        info!(artifact = %artifact, "artifact shared");
        Ok(())
    }
}
