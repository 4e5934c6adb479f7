//! Scripted stand-ins for the adb bridge and the report file.

use crate::adb::client::BridgeOutput;
use crate::adb::DeviceBridge;
use crate::core::{HarnessError, Result};
use crate::stress::record::CycleRecord;
use crate::stress::sink::ReportSink;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Reply {
    Stdout(&'static str),
    Stderr(&'static str),
    ChannelError(&'static str),
    Hang,
    Panic(&'static str),
}

/// Answers `reboot` and boot-property queries from two scripts, falling back
/// to a fixed reply once a script runs dry.
pub struct ScriptedBridge {
    reboots: RefCell<VecDeque<Reply>>,
    boot_queries: RefCell<VecDeque<Reply>>,
    reboot_fallback: Reply,
    boot_fallback: Reply,
    reboot_calls: Cell<u32>,
    boot_calls: Cell<u32>,
    stop_after: Option<(Arc<AtomicBool>, u32)>,
}
impl ScriptedBridge {
    pub fn healthy() -> Self {
        Self {
            reboots: RefCell::new(VecDeque::new()),
            boot_queries: RefCell::new(VecDeque::new()),
            reboot_fallback: Reply::Stdout(""),
            boot_fallback: Reply::Stdout("1\n"),
            reboot_calls: Cell::new(0),
            boot_calls: Cell::new(0),
            stop_after: None,
        }
    }
    pub fn reboots(self, script: impl IntoIterator<Item = Reply>) -> Self {
        self.reboots.borrow_mut().extend(script);
        self
    }
    pub fn boot_queries(self, script: impl IntoIterator<Item = Reply>) -> Self {
        self.boot_queries.borrow_mut().extend(script);
        self
    }
    pub fn reboot_fallback(mut self, reply: Reply) -> Self {
        self.reboot_fallback = reply;
        self
    }
    pub fn boot_fallback(mut self, reply: Reply) -> Self {
        self.boot_fallback = reply;
        self
    }
    /// Raises `flag` while serving the `n`th reboot.
    pub fn stop_after(mut self, flag: Arc<AtomicBool>, n: u32) -> Self {
        self.stop_after = Some((flag, n));
        self
    }
    pub fn reboot_calls(&self) -> u32 {
        self.reboot_calls.get()
    }
    pub fn boot_calls(&self) -> u32 {
        self.boot_calls.get()
    }
}
impl DeviceBridge for ScriptedBridge {
    async fn invoke(&self, _serial: &str, args: &[&str]) -> Result<BridgeOutput> {
        let reply = if args.first() == Some(&"reboot") {
            let n = self.reboot_calls.get() + 1;
            self.reboot_calls.set(n);
            if let Some((flag, at)) = &self.stop_after {
                if n >= *at {
                    flag.store(true, Ordering::SeqCst);
                }
            }
            let next = self.reboots.borrow_mut().pop_front();
            next.unwrap_or_else(|| self.reboot_fallback.clone())
        } else {
            self.boot_calls.set(self.boot_calls.get() + 1);
            let next = self.boot_queries.borrow_mut().pop_front();
            next.unwrap_or_else(|| self.boot_fallback.clone())
        };
        match reply {
            Reply::Stdout(out) => Ok(BridgeOutput {
                success: true,
                stdout: out.to_string(),
                stderr: String::new(),
            }),
            Reply::Stderr(err) => Ok(BridgeOutput {
                success: false,
                stdout: String::new(),
                stderr: err.to_string(),
            }),
            Reply::ChannelError(msg) => Err(HarnessError::CommandFailed(msg.to_string())),
            Reply::Hang => std::future::pending().await,
            Reply::Panic(msg) => panic!("{}", msg),
        }
    }
}

/// Keeps the record count of every write; clones share the log.
#[derive(Clone, Default)]
pub struct MemorySink {
    pub writes: Rc<RefCell<Vec<usize>>>,
    pub fail: bool,
    /// Panics once, on the first write carrying this many records.
    pub panic_at: Rc<Cell<Option<usize>>>,
}
impl ReportSink for MemorySink {
    fn describe(&self) -> String {
        "memory".to_string()
    }
    fn write(&mut self, records: &[CycleRecord]) -> Result<()> {
        if self.fail {
            return Err(HarnessError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }
        if self.panic_at.get() == Some(records.len()) {
            self.panic_at.set(None);
            panic!("sink blew up at {} records", records.len());
        }
        self.writes.borrow_mut().push(records.len());
        Ok(())
    }
}
