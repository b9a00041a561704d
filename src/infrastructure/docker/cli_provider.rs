//! Container provider that shells out to the docker CLI.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::process::Command;

use crate::domain::entities::ContainerInfo;
use crate::domain::repositories::ContainerProvider;
use crate::error::AppError;

/// One row of `docker ps --format '{{json .}}'`.
#[derive(Debug, Deserialize)]
struct PsRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Names")]
    names: String,
    #[serde(rename = "Image")]
    image: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Status")]
    status: String,
}

impl From<PsRow> for ContainerInfo {
    fn from(row: PsRow) -> Self {
        Self {
            id: row.id,
            // docker joins multiple names with commas; the first is canonical
            name: row
                .names
                .split(',')
                .next()
                .unwrap_or_default()
                .trim_start_matches('/')
                .to_string(),
            image: row.image,
            state: row.state,
            status: row.status,
        }
    }
}

/// Queries containers through the docker CLI.
///
/// Uses `--format '{{json .}}'` so the output is line-delimited JSON and
/// stable across docker versions.
pub struct DockerCliProvider {
    docker_bin: String,
}

impl DockerCliProvider {
    pub fn new(docker_bin: impl Into<String>) -> Self {
        Self {
            docker_bin: docker_bin.into(),
        }
    }

    fn parse_output(stdout: &str) -> Result<Vec<ContainerInfo>, AppError> {
        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str::<PsRow>(line)
                    .map(ContainerInfo::from)
                    .map_err(|e| {
                        tracing::error!("Unparseable docker ps row: {e}");
                        AppError::internal(
                            "Failed to parse container listing",
                            json!({ "reason": e.to_string() }),
                        )
                    })
            })
            .collect()
    }
}

#[async_trait]
impl ContainerProvider for DockerCliProvider {
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, AppError> {
        let output = Command::new(&self.docker_bin)
            .args(["ps", "--all", "--no-trunc", "--format", "{{json .}}"])
            .output()
            .await
            .map_err(|e| {
                tracing::error!("Failed to invoke {}: {e}", self.docker_bin);
                AppError::service_unavailable(
                    "Service error: container runtime unavailable",
                    json!({ "docker_bin": self.docker_bin }),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("docker ps failed ({}): {stderr}", output.status);
            return Err(AppError::service_unavailable(
                "Service error: container runtime unavailable",
                json!({ "status": output.status.code() }),
            ));
        }

        Self::parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output() {
        let stdout = concat!(
            r#"{"ID":"abc","Names":"minecraft","Image":"itzg/minecraft-server","State":"running","Status":"Up 3 hours"}"#,
            "\n",
            r#"{"ID":"def","Names":"/valheim,alias","Image":"lloesche/valheim-server","State":"exited","Status":"Exited (0) 2 days ago"}"#,
            "\n",
        );

        let containers = DockerCliProvider::parse_output(stdout).unwrap();
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].name, "minecraft");
        assert!(containers[0].is_running());
        assert_eq!(containers[1].name, "valheim");
        assert!(!containers[1].is_running());
    }

    #[test]
    fn test_parse_output_empty() {
        assert!(DockerCliProvider::parse_output("\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_output_garbage_is_internal_error() {
        let result = DockerCliProvider::parse_output("not json\n");
        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }
}
