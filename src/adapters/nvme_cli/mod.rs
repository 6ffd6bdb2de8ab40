mod parser;

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::{Device, DevicePath};
use crate::ports::{DeviceSource, SourceError};

pub use parser::parse_device_list;

/// How to invoke nvme-cli
#[derive(Debug, Clone)]
pub struct NvmeCliConfig {
    pub binary: String,
    pub use_sudo: bool,
}

impl NvmeCliConfig {
    pub fn new(binary: impl Into<String>, use_sudo: bool) -> Self {
        Self {
            binary: binary.into(),
            use_sudo,
        }
    }
}

impl Default for NvmeCliConfig {
    fn default() -> Self {
        Self::new("nvme", true)
    }
}

/// Device source that shells out to `nvme list` and `nvme smart-log`
#[derive(Debug, Clone)]
pub struct NvmeCliSource {
    config: NvmeCliConfig,
    elevate: bool,
}

impl NvmeCliSource {
    pub fn new(config: NvmeCliConfig) -> Self {
        // sudo is pointless (and may not be installed) when already root
        let elevate = config.use_sudo && !nix::unistd::geteuid().is_root();
        Self { config, elevate }
    }

    fn program_and_args<'a>(&'a self, args: &[&'a str]) -> (&'a str, Vec<&'a str>) {
        if self.elevate {
            let mut full = vec!["-n", self.config.binary.as_str()];
            full.extend_from_slice(args);
            ("sudo", full)
        } else {
            (self.config.binary.as_str(), args.to_vec())
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        let (program, args) = self.program_and_args(args);
        std::iter::once(program).chain(args).collect::<Vec<_>>().join(" ")
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, SourceError> {
        let (program, full_args) = self.program_and_args(args);
        let command = self.describe(args);
        debug!(command = %command, "Running nvme-cli");

        let output = Command::new(program)
            .args(&full_args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl DeviceSource for NvmeCliSource {
    async fn list_devices(&self) -> Result<Vec<Device>, SourceError> {
        let stdout = self.run(&["list", "-o", "json"]).await?;
        Ok(parse_device_list(&stdout)?)
    }

    async fn get_telemetry(&self, path: &DevicePath) -> Result<Vec<u8>, SourceError> {
        self.run(&["smart-log", path.as_str(), "-o", "json"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(binary: &str, elevate: bool) -> NvmeCliSource {
        NvmeCliSource {
            config: NvmeCliConfig::new(binary, elevate),
            elevate,
        }
    }

    #[test]
    fn test_command_line_with_and_without_sudo() {
        assert_eq!(
            source("nvme", true).describe(&["smart-log", "/dev/nvme0n1", "-o", "json"]),
            "sudo -n nvme smart-log /dev/nvme0n1 -o json"
        );
        assert_eq!(
            source("/usr/sbin/nvme", false).describe(&["list", "-o", "json"]),
            "/usr/sbin/nvme list -o json"
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let err = source("/nonexistent/nvme", false).list_devices().await.unwrap_err();
        assert!(matches!(err, SourceError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_a_command_failure() {
        let err = source("false", false)
            .get_telemetry(&DevicePath::from("/dev/nvme0n1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::CommandFailed { .. }));
    }
}
