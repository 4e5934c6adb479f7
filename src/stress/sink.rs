use crate::core::Result;
use crate::stress::record::CycleRecord;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destination for the accumulated cycle records. Each write replaces the
/// previous contents with the full record list.
pub trait ReportSink {
    fn describe(&self) -> String;
    fn write(&mut self, records: &[CycleRecord]) -> Result<()>;
}

#[derive(Serialize)]
struct CsvRow<'a> {
    cycle: u32,
    start_time: String,
    end_time: Option<String>,
    reboot_success: bool,
    boot_success: bool,
    error_type: Option<&'static str>,
    error_message: Option<&'a str>,
    duration_seconds: Option<String>,
}
impl<'a> From<&'a CycleRecord> for CsvRow<'a> {
    fn from(r: &'a CycleRecord) -> Self {
        Self {
            cycle: r.cycle,
            start_time: r.start_time.format(TIMESTAMP_FORMAT).to_string(),
            end_time: r.end_time.map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
            reboot_success: r.reboot_success,
            boot_success: r.boot_success,
            error_type: r.error_category.map(|c| c.as_str()),
            error_message: r.error_detail.as_deref(),
            duration_seconds: r.duration_seconds.map(|d| format!("{:.2}", d)),
        }
    }
}

/// CSV report with a byte-order mark so spreadsheet tools pick UTF-8.
pub struct CsvSink {
    path: PathBuf,
}
impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl ReportSink for CsvSink {
    fn describe(&self) -> String {
        self.path().display().to_string()
    }
    fn write(&mut self, records: &[CycleRecord]) -> Result<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(UTF8_BOM)?;
        let mut writer = csv::Writer::from_writer(file);
        for record in records {
            writer.serialize(CsvRow::from(record))?;
        }
        writer.flush()?;
        Ok(())
    }
}
