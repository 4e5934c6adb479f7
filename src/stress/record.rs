use chrono::{DateTime, Local};
use std::fmt;
use std::time::Duration;

/// Closed set of failure categories a cycle can end in.
///
/// Declaration order doubles as the tie-break order in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    ConnectionFailure,
    CommandTimeout,
    BootTimeout,
    DeviceAbsent,
    /// Reserved; nothing currently produces it.
    BootFailure,
    Unspecified,
}
impl ErrorCategory {
    pub const ALL: [ErrorCategory; 6] = [
        Self::ConnectionFailure,
        Self::CommandTimeout,
        Self::BootTimeout,
        Self::DeviceAbsent,
        Self::BootFailure,
        Self::Unspecified,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectionFailure => "connection_failure",
            Self::CommandTimeout => "command_timeout",
            Self::BootTimeout => "boot_timeout",
            Self::DeviceAbsent => "device_absent",
            Self::BootFailure => "boot_failure",
            Self::Unspecified => "unspecified",
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConnectionFailure => "ADB connection failure",
            Self::CommandTimeout => "Reboot command timeout",
            Self::BootTimeout => "Boot timeout",
            Self::DeviceAbsent => "Device not connected",
            Self::BootFailure => "Boot failure",
            Self::Unspecified => "Unknown error",
        }
    }
}
impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one reboot cycle.
///
/// Built through [`CycleRecord::started`] and then exactly one of
/// [`CycleRecord::failed`] or [`CycleRecord::completed`], which keeps
/// `error_category` set iff the cycle did not fully succeed and
/// `duration_seconds` set iff it did.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleRecord {
    pub cycle: u32,
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
    pub reboot_success: bool,
    pub boot_success: bool,
    pub error_category: Option<ErrorCategory>,
    pub error_detail: Option<String>,
    pub duration_seconds: Option<f64>,
}
impl CycleRecord {
    pub fn started(cycle: u32, start_time: DateTime<Local>) -> Self {
        Self {
            cycle,
            start_time,
            end_time: None,
            reboot_success: false,
            boot_success: false,
            error_category: None,
            error_detail: None,
            duration_seconds: None,
        }
    }
    pub fn rebooted(mut self) -> Self {
        self.reboot_success = true;
        self
    }
    /// Empty details fall back to the category label.
    pub fn failed(mut self, category: ErrorCategory, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let detail = if detail.trim().is_empty() {
            category.label().to_string()
        } else {
            detail
        };
        self.boot_success = false;
        self.error_category = Some(category);
        self.error_detail = Some(detail);
        self.end_time = None;
        self.duration_seconds = None;
        self
    }
    pub fn completed(mut self, end_time: DateTime<Local>, elapsed: Duration) -> Self {
        self.reboot_success = true;
        self.boot_success = true;
        self.end_time = Some(end_time);
        self.duration_seconds = Some(round2(elapsed.as_secs_f64()));
        self.error_category = None;
        self.error_detail = None;
        self
    }
    pub fn is_success(&self) -> bool {
        self.reboot_success && self.boot_success
    }
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariant_holds(r: &CycleRecord) -> bool {
        r.error_category.is_some() == !r.is_success()
            && r.duration_seconds.is_some() == r.is_success()
    }

    #[test]
    fn failed_before_reboot_keeps_both_flags_false() {
        let r = CycleRecord::started(1, Local::now()).failed(ErrorCategory::DeviceAbsent, "device not found");
        assert!(!r.reboot_success && !r.boot_success);
        assert_eq!(r.error_category, Some(ErrorCategory::DeviceAbsent));
        assert_eq!(r.error_detail.as_deref(), Some("device not found"));
        assert!(invariant_holds(&r));
    }

    #[test]
    fn failed_after_reboot_keeps_reboot_flag() {
        let r = CycleRecord::started(2, Local::now())
            .rebooted()
            .failed(ErrorCategory::BootTimeout, "");
        assert!(r.reboot_success && !r.boot_success);
        assert_eq!(r.error_detail.as_deref(), Some("Boot timeout"));
        assert!(invariant_holds(&r));
    }

    #[test]
    fn completed_rounds_duration_to_two_decimals() {
        let r = CycleRecord::started(3, Local::now())
            .rebooted()
            .completed(Local::now(), Duration::from_millis(42_346));
        assert_eq!(r.duration_seconds, Some(42.35));
        assert!(r.end_time.is_some());
        assert!(invariant_holds(&r));
    }

    #[test]
    fn category_names_are_stable() {
        let names: Vec<_> = ErrorCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            [
                "connection_failure",
                "command_timeout",
                "boot_timeout",
                "device_absent",
                "boot_failure",
                "unspecified"
            ]
        );
        assert_eq!(ErrorCategory::BootFailure.to_string(), "Boot failure");
    }
}
