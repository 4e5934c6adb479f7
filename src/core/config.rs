use crate::core::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Run parameters for a reboot stress session.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub cycles: u32,
    pub output: PathBuf,
    pub adb_path: Option<PathBuf>,
    pub reboot_timeout_secs: u64,
    pub boot_deadline_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub checkpoint_every: u32,
    pub cooldown_secs: u64,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            cycles: 1000,
            output: PathBuf::from("reboot_test_results.csv"),
            adb_path: None,
            reboot_timeout_secs: 30,
            boot_deadline_secs: 180,
            poll_interval_secs: 5,
            poll_timeout_secs: 10,
            checkpoint_every: 10,
            cooldown_secs: 2,
        }
    }
}
impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                serde_json::from_str(&raw)?
            }
            None => Self::default(),
        };
        Ok(config)
    }
    pub fn validate(&self) -> Result<()> {
        if self.cycles == 0 {
            return Err(HarnessError::Config("cycles must be at least 1".to_string()));
        }
        if self.checkpoint_every == 0 {
            return Err(HarnessError::Config(
                "checkpoint_every must be at least 1".to_string(),
            ));
        }
        let timings = [
            ("reboot_timeout_secs", self.reboot_timeout_secs),
            ("boot_deadline_secs", self.boot_deadline_secs),
            ("poll_interval_secs", self.poll_interval_secs),
            ("poll_timeout_secs", self.poll_timeout_secs),
        ];
        for (name, value) in timings {
            if value == 0 {
                return Err(HarnessError::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }
    pub fn reboot_timeout(&self) -> Duration {
        Duration::from_secs(self.reboot_timeout_secs)
    }
    pub fn boot_deadline(&self) -> Duration {
        Duration::from_secs(self.boot_deadline_secs)
    }
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
