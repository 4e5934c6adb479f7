use crate::adb::DeviceBridge;
use crate::stress::executor::CommandExecutor;
use std::time::Duration;
use tokio::time::{sleep, Instant};

pub const BOOT_COMPLETED_PROP: &str = "sys.boot_completed";
pub const BOOT_COMPLETE_VALUE: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStatus {
    Booted,
    TimedOut,
}
impl BootStatus {
    pub fn is_booted(&self) -> bool {
        matches!(self, Self::Booted)
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booted => "boot_success",
            Self::TimedOut => "boot_timeout",
        }
    }
}

/// Polls `sys.boot_completed` until the device reports it has finished booting.
#[derive(Debug, Clone)]
pub struct BootPoller {
    interval: Duration,
    query_timeout: Duration,
}
impl Default for BootPoller {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(10))
    }
}
impl BootPoller {
    pub fn new(interval: Duration, query_timeout: Duration) -> Self {
        Self {
            interval,
            query_timeout,
        }
    }
    /// A failed query counts as "not booted yet"; only running past `deadline`
    /// ends the wait unsuccessfully.
    pub async fn await_boot<B: DeviceBridge>(
        &self,
        executor: &CommandExecutor<B>,
        deadline: Duration,
    ) -> BootStatus {
        let started = Instant::now();
        while started.elapsed() < deadline {
            let reply = executor
                .execute(&["shell", "getprop", BOOT_COMPLETED_PROP], self.query_timeout)
                .await;
            if matches!(reply.as_deref(), Ok(BOOT_COMPLETE_VALUE)) {
                return BootStatus::Booted;
            }
            sleep(self.interval).await;
        }
        BootStatus::TimedOut
    }
}
