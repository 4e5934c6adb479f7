use crate::adb::DeviceBridge;
use crate::stress::classifier::classify;
use crate::stress::record::ErrorCategory;
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;

/// A command that did not produce output, with whatever text explains why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub category: ErrorCategory,
    pub detail: String,
}
impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.category)
        } else {
            write!(f, "{}: {}", self.category, self.detail)
        }
    }
}
impl std::error::Error for CommandFailure {}

/// Runs device commands against the selected serial with a hard time limit.
pub struct CommandExecutor<B> {
    bridge: B,
    serial: String,
}
impl<B: DeviceBridge> CommandExecutor<B> {
    pub fn new(bridge: B, serial: impl Into<String>) -> Self {
        Self {
            bridge,
            serial: serial.into(),
        }
    }
    pub fn serial(&self) -> &str {
        &self.serial
    }
    #[cfg(test)]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }
    /// Returns trimmed stdout. Expiry is reported as a command timeout without
    /// looking at any output; channel failures are unspecified.
    pub async fn execute(&self, args: &[&str], limit: Duration) -> Result<String, CommandFailure> {
        match timeout(limit, self.bridge.invoke(&self.serial, args)).await {
            Err(_) => Err(CommandFailure {
                category: ErrorCategory::CommandTimeout,
                detail: format!("`{}` timed out after {}s", args.join(" "), limit.as_secs()),
            }),
            Ok(Err(e)) => Err(CommandFailure {
                category: ErrorCategory::Unspecified,
                detail: e.to_string(),
            }),
            Ok(Ok(out)) if out.success => Ok(out.stdout.trim().to_string()),
            Ok(Ok(out)) => {
                let stderr = out.stderr.trim();
                Err(CommandFailure {
                    category: classify(stderr),
                    detail: stderr.to_string(),
                })
            }
        }
    }
}
