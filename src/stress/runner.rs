use crate::adb::DeviceBridge;
use crate::core::Config;
use crate::stress::cycle::{panic_message, CycleRunner};
use crate::stress::session::TestSession;
use crate::stress::sink::ReportSink;
use crate::ui::ConsoleUi;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub completed: u32,
    /// Includes the final write at the end of the run.
    pub checkpoints: u32,
    pub interrupted: bool,
    /// The loop panicked outside a cycle and was cut short.
    pub faulted: bool,
}

/// Marks a stop request; `true` only for the first one.
pub fn request_stop(stop: &AtomicBool) -> bool {
    !stop.swap(true, Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    pub cycles: u32,
    pub checkpoint_every: u32,
    pub cooldown: Duration,
}
impl From<&Config> for LoopSettings {
    fn from(config: &Config) -> Self {
        Self {
            cycles: config.cycles,
            checkpoint_every: config.checkpoint_every,
            cooldown: config.cooldown(),
        }
    }
}

/// Drives cycles `1..=N` one after another against a single device.
///
/// A stop request is only looked at between cycles; a cycle in flight always
/// runs to its own end.
pub struct StressRunner<B, S> {
    cycles: CycleRunner<B>,
    sink: S,
    session: TestSession,
    settings: LoopSettings,
    stop: Arc<AtomicBool>,
}
impl<B: DeviceBridge, S: ReportSink> StressRunner<B, S> {
    pub fn new(cycles: CycleRunner<B>, sink: S, settings: LoopSettings) -> Self {
        Self {
            cycles,
            sink,
            session: TestSession::new(),
            settings,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }
    #[cfg(test)]
    pub fn session(&self) -> &TestSession {
        &self.session
    }
    #[cfg(test)]
    pub fn cycle_runner(&self) -> &CycleRunner<B> {
        &self.cycles
    }
    /// The final checkpoint runs exactly once, whether the loop finished,
    /// was stopped, or panicked between cycles.
    pub async fn run(&mut self) -> RunOutcome {
        let total = self.settings.cycles;
        ConsoleUi::info(&format!(
            "Starting reboot stress test on {}: {} cycles",
            self.cycles.executor().serial(),
            total
        ));
        ConsoleUi::info("Press Ctrl+C to stop after the current cycle");

        let mut outcome = RunOutcome::default();
        if let Err(payload) = AssertUnwindSafe(self.drive(&mut outcome)).catch_unwind().await {
            outcome.faulted = true;
            ConsoleUi::error(&format!(
                "Test aborted after {} cycles: {}",
                outcome.completed,
                panic_message(payload.as_ref())
            ));
        }
        if outcome.interrupted {
            ConsoleUi::warn(&format!(
                "Test interrupted after {} of {} cycles",
                outcome.completed, total
            ));
        }
        self.checkpoint();
        outcome.checkpoints += 1;
        outcome
    }
    async fn drive(&mut self, outcome: &mut RunOutcome) {
        let total = self.settings.cycles;
        for index in 1..=total {
            if self.stop.load(Ordering::SeqCst) {
                outcome.interrupted = true;
                break;
            }
            ConsoleUi::heading(&format!("Cycle #{}/{}", index, total));
            self.cycles.run_cycle(index, &mut self.session).await;
            outcome.completed = index;

            if index % self.settings.checkpoint_every == 0 {
                self.checkpoint();
                outcome.checkpoints += 1;
            }
            if index < total {
                sleep(self.settings.cooldown).await;
            }
        }
    }
    fn checkpoint(&mut self) {
        self.session.persist(&mut self.sink);
        self.session.summarize();
    }
}
