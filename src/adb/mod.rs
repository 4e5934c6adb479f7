pub mod client;
pub mod device;

pub use client::{AdbClient, DeviceBridge};
pub use device::{Device, DeviceManager};
