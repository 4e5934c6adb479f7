use crate::core::{HarnessError, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Raw result of one command sent over the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Command channel to a single addressed device.
///
/// `Err` means the channel itself failed (spawn error, broken pipe); a command
/// that ran and exited non-zero is `Ok` with `success == false`.
pub trait DeviceBridge {
    fn invoke(&self, serial: &str, args: &[&str]) -> impl Future<Output = Result<BridgeOutput>>;
}

#[derive(Debug, Clone)]
pub struct AdbClient {
    adb_path: PathBuf,
}
impl AdbClient {
    pub fn new(explicit: Option<&Path>) -> Result<Self> {
        let adb_path = match explicit {
            Some(p) if p.exists() => p.to_path_buf(),
            Some(_) => return Err(HarnessError::AdbNotFound),
            None => Self::resolve_adb()?,
        };
        Ok(Self { adb_path })
    }
    fn resolve_adb() -> Result<PathBuf> {
        let exe_name = if cfg!(windows) { "adb.exe" } else { "adb" };
        if let Ok(current_exe) = std::env::current_exe() {
            if let Some(parent) = current_exe.parent() {
                let bundled = parent.join("platform-tools").join(exe_name);
                if bundled.exists() {
                    return Ok(bundled);
                }
                let vendor_bundled = parent.join("vendor").join("platform-tools").join(exe_name);
                if vendor_bundled.exists() {
                    return Ok(vendor_bundled);
                }
            }
        }
        if let Some(paths) = std::env::var_os("PATH") {
            for dir in std::env::split_paths(&paths) {
                let candidate = dir.join(exe_name);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }
        Err(HarnessError::AdbNotFound)
    }
    pub fn path(&self) -> &Path {
        &self.adb_path
    }
    pub async fn ensure_present(&self) -> Result<()> {
        let output = timeout(
            Duration::from_secs(10),
            Command::new(&self.adb_path).arg("version").kill_on_drop(true).output(),
        )
        .await
        .map_err(|_| HarnessError::Timeout(10))??;
        if output.status.success() {
            Ok(())
        } else {
            Err(HarnessError::CommandFailed("adb version failed".to_string()))
        }
    }
    pub async fn start_server(&self) -> Result<()> {
        let output = timeout(
            Duration::from_secs(10),
            Command::new(&self.adb_path).arg("start-server").kill_on_drop(true).output(),
        )
        .await
        .map_err(|_| HarnessError::Timeout(10))??;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::CommandFailed(stderr.trim().to_string()));
        }
        Ok(())
    }
    pub async fn execute(&self, args: &[&str]) -> Result<(String, String)> {
        let (ok, stdout, stderr) = self.try_execute(args).await?;
        if !ok {
            return Err(HarnessError::CommandFailed(stderr));
        }
        Ok((stdout, stderr))
    }
    pub async fn try_execute(&self, args: &[&str]) -> Result<(bool, String, String)> {
        // Dropping the future on timeout must not leave an orphaned adb child.
        let output = Command::new(&self.adb_path)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        Ok((output.status.success(), stdout, stderr))
    }
    pub async fn shell(&self, serial: &str, cmd: &[&str]) -> Result<String> {
        let mut args = vec!["-s", serial, "shell"];
        args.extend_from_slice(cmd);
        let (stdout, _) = self.execute(&args).await?;
        Ok(stdout)
    }
}
impl DeviceBridge for AdbClient {
    async fn invoke(&self, serial: &str, args: &[&str]) -> Result<BridgeOutput> {
        let mut full = vec!["-s", serial];
        full.extend_from_slice(args);
        let (success, stdout, stderr) = self.try_execute(&full).await?;
        Ok(BridgeOutput { success, stdout, stderr })
    }
}
