use crate::stress::record::ErrorCategory;

const DEVICE_ABSENT: &[&str] = &[
    "device not found",
    "no devices",
    "device offline",
    "device unauthorized",
];
const TIMEOUT: &[&str] = &["timeout", "timed out"];
const FAILURE: &[&str] = &["error", "fail"];

/// Maps adb error text onto an [`ErrorCategory`].
///
/// Checked in a fixed order: device absence, then timeouts, then generic
/// failures. Text matching several groups takes the earliest one.
pub fn classify(raw: &str) -> ErrorCategory {
    let text = raw.to_lowercase();
    let hit = |phrases: &[&str]| phrases.iter().any(|p| text.contains(p));
    if hit(DEVICE_ABSENT) {
        ErrorCategory::DeviceAbsent
    } else if hit(TIMEOUT) {
        ErrorCategory::CommandTimeout
    } else if hit(FAILURE) {
        ErrorCategory::ConnectionFailure
    } else {
        ErrorCategory::Unspecified
    }
}
