use crate::adb::DeviceBridge;
use crate::core::Config;
use crate::stress::executor::CommandExecutor;
use crate::stress::poller::BootPoller;
use crate::stress::record::{CycleRecord, ErrorCategory};
use crate::stress::session::TestSession;
use crate::ui::ConsoleUi;
use chrono::Local;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub reboot_timeout: Duration,
    pub boot_deadline: Duration,
    pub poller: BootPoller,
}
impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            reboot_timeout: Duration::from_secs(30),
            boot_deadline: Duration::from_secs(180),
            poller: BootPoller::default(),
        }
    }
}
impl CycleSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            reboot_timeout: config.reboot_timeout(),
            boot_deadline: config.boot_deadline(),
            poller: BootPoller::new(config.poll_interval(), config.poll_timeout()),
        }
    }
}

/// One reboot cycle: issue `adb reboot`, wait for boot, record the outcome.
pub struct CycleRunner<B> {
    executor: CommandExecutor<B>,
    settings: CycleSettings,
}
impl<B: DeviceBridge> CycleRunner<B> {
    pub fn new(executor: CommandExecutor<B>, settings: CycleSettings) -> Self {
        Self { executor, settings }
    }
    pub fn executor(&self) -> &CommandExecutor<B> {
        &self.executor
    }
    /// Always appends exactly one record. A panic anywhere inside the cycle is
    /// recorded as an unspecified failure instead of unwinding into the caller.
    pub async fn run_cycle<'s>(&self, index: u32, session: &'s mut TestSession) -> &'s CycleRecord {
        let start_time = Local::now();
        let record = match AssertUnwindSafe(self.drive(index, start_time)).catch_unwind().await {
            Ok(record) => record,
            Err(payload) => CycleRecord::started(index, start_time).failed(
                ErrorCategory::Unspecified,
                format!("unclassified fault: {}", panic_message(payload.as_ref())),
            ),
        };
        match record.error_category {
            None => ConsoleUi::success(&format!(
                "Cycle #{} passed in {:.2}s",
                index,
                record.duration_seconds.unwrap_or_default()
            )),
            Some(category) => ConsoleUi::warn(&format!("Cycle #{} failed: {}", index, category)),
        }
        session.append(record)
    }
    async fn drive(&self, index: u32, start_time: chrono::DateTime<Local>) -> CycleRecord {
        let record = CycleRecord::started(index, start_time);
        let issued = Instant::now();

        ConsoleUi::info("Rebooting...");
        if let Err(failure) = self.executor.execute(&["reboot"], self.settings.reboot_timeout).await {
            return record.failed(failure.category, failure.detail);
        }
        let record = record.rebooted();

        ConsoleUi::info("Waiting for boot to complete...");
        let status = self
            .settings
            .poller
            .await_boot(&self.executor, self.settings.boot_deadline)
            .await;
        if !status.is_booted() {
            return record.failed(
                ErrorCategory::BootTimeout,
                format!(
                    "{}: {} not reached within {}s",
                    status.as_str(),
                    crate::stress::poller::BOOT_COMPLETED_PROP,
                    self.settings.boot_deadline.as_secs()
                ),
            );
        }
        record.completed(Local::now(), issued.elapsed())
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
