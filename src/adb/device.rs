use crate::adb::client::AdbClient;
use crate::core::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub serial: String,
    pub state: String,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub android_version: Option<String>,
}
impl Device {
    pub fn display_name(&self) -> String {
        match (&self.brand, &self.model) {
            (Some(brand), Some(model)) => format!("{} {}", brand, model).trim().to_string(),
            (None, Some(model)) => model.clone(),
            _ => self.serial.clone(),
        }
    }
}
pub struct DeviceManager {
    client: AdbClient,
}
impl DeviceManager {
    pub fn new(client: AdbClient) -> Self {
        Self { client }
    }
    /// Authorized devices in the order adb reports them.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let (output, _) = self.client.execute(&["devices", "-l"]).await?;
        Ok(parse_device_list(&output))
    }
    /// Fills in model, brand and Android version; failures leave the fields empty.
    pub async fn describe(&self, device: &mut Device) {
        let props = self.get_properties(&device.serial).await.unwrap_or_default();
        device.model = props.get("ro.product.model").cloned();
        device.brand = props.get("ro.product.brand").cloned();
        device.android_version = props.get("ro.build.version.release").cloned();
    }
    pub async fn get_properties(&self, serial: &str) -> Result<HashMap<String, String>> {
        let output = self.client.shell(serial, &["getprop"]).await?;
        Ok(parse_properties(&output))
    }
}

/// The harness drives exactly one device: the first one adb reports.
pub fn pick_first(mut devices: Vec<Device>) -> Result<Device> {
    if devices.is_empty() {
        return Err(HarnessError::NoDevices);
    }
    Ok(devices.swap_remove(0))
}

fn parse_device_list(output: &str) -> Vec<Device> {
    let mut devices = Vec::new();
    for line in output.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('*') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 || parts[1] != "device" {
            continue;
        }
        devices.push(Device {
            serial: parts[0].to_string(),
            state: parts[1].to_string(),
            model: None,
            brand: None,
            android_version: None,
        });
    }
    devices
}

fn parse_properties(output: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    for line in output.lines() {
        let line = line.trim();
        if !line.starts_with('[') {
            continue;
        }
        if let Some(idx) = line.find("]: [") {
            let key = &line[1..idx];
            let rest = &line[idx + 4..];
            if let Some(end) = rest.rfind(']') {
                props.insert(key.to_string(), rest[..end].to_string());
            }
        }
    }
    props
}
