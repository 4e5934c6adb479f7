use crate::stress::record::{round2, CycleRecord, ErrorCategory};
use crate::stress::sink::ReportSink;
use crate::ui::ConsoleUi;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: ErrorCategory,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success_rate: f64,
    /// Highest count first; equal counts keep category declaration order.
    pub breakdown: Vec<CategoryCount>,
}

/// Records of one run, in cycle order, plus per-category failure counts.
///
/// The counts only change through [`TestSession::append`], so they always
/// agree with the records.
#[derive(Debug, Default)]
pub struct TestSession {
    records: Vec<CycleRecord>,
    error_stats: BTreeMap<ErrorCategory, u64>,
}
impl TestSession {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn append(&mut self, record: CycleRecord) -> &CycleRecord {
        if let Some(category) = record.error_category {
            *self.error_stats.entry(category).or_insert(0) += 1;
        }
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }
    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }
    pub fn error_count(&self, category: ErrorCategory) -> u64 {
        self.error_stats.get(&category).copied().unwrap_or(0)
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    /// Never fails the run: problems are reported on the console and `false`
    /// is returned.
    pub fn persist(&self, sink: &mut impl ReportSink) -> bool {
        if self.is_empty() {
            ConsoleUi::warn("No test results to save");
            return false;
        }
        match sink.write(self.records()) {
            Ok(()) => {
                ConsoleUi::info(&format!("Results saved to {}", sink.describe()));
                true
            }
            Err(e) => {
                ConsoleUi::error(&format!("Failed to save results to {}: {}", sink.describe(), e));
                false
            }
        }
    }
    pub fn summary(&self) -> Option<Summary> {
        if self.is_empty() {
            return None;
        }
        let total = self.len();
        let succeeded = self.records().iter().filter(|r| r.is_success()).count();
        let mut breakdown: Vec<CategoryCount> = ErrorCategory::ALL
            .iter()
            .map(|&category| (category, self.error_count(category)))
            .filter(|&(_, count)| count > 0)
            .map(|(category, count)| CategoryCount {
                category,
                count,
                percent: count as f64 / total as f64 * 100.0,
            })
            .collect();
        // Stable sort: equal counts stay in declaration order.
        breakdown.sort_by(|a, b| b.count.cmp(&a.count));
        Some(Summary {
            total,
            succeeded,
            failed: total - succeeded,
            success_rate: round2(succeeded as f64 / total as f64 * 100.0),
            breakdown,
        })
    }
    pub fn summarize(&self) {
        let Some(summary) = self.summary() else {
            ConsoleUi::warn("No test results available");
            return;
        };
        ConsoleUi::heading("Test summary:");
        println!("Total cycles: {}", summary.total);
        println!("Succeeded: {}", summary.succeeded);
        println!("Failed: {}", summary.failed);
        println!("Success rate: {:.2}%", summary.success_rate);
        if !summary.breakdown.is_empty() {
            ConsoleUi::heading("Error statistics:");
            for entry in &summary.breakdown {
                println!("{}: {} ({:.1}%)", entry.category, entry.count, entry.percent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::testing::MemorySink;
    use chrono::Local;
    use std::time::Duration;

    fn ok(i: u32) -> CycleRecord {
        CycleRecord::started(i, Local::now())
            .rebooted()
            .completed(Local::now(), Duration::from_secs(30))
    }

    fn bad(i: u32, category: ErrorCategory) -> CycleRecord {
        CycleRecord::started(i, Local::now()).failed(category, "")
    }

    #[test]
    fn append_keeps_order_and_counts() {
        let mut s = TestSession::new();
        s.append(ok(1));
        s.append(bad(2, ErrorCategory::BootTimeout));
        s.append(bad(3, ErrorCategory::BootTimeout));
        let cycles: Vec<_> = s.records().iter().map(|r| r.cycle).collect();
        assert_eq!(cycles, vec![1, 2, 3]);
        assert_eq!(s.error_count(ErrorCategory::BootTimeout), 2);
        assert_eq!(s.error_count(ErrorCategory::DeviceAbsent), 0);
    }

    #[test]
    fn summary_of_empty_session_is_none() {
        let s = TestSession::new();
        assert!(s.summary().is_none());
        s.summarize();
    }

    #[test]
    fn success_rate_has_two_decimals() {
        let mut s = TestSession::new();
        s.append(ok(1));
        s.append(bad(2, ErrorCategory::Unspecified));
        s.append(bad(3, ErrorCategory::CommandTimeout));
        let summary = s.summary().unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.success_rate, 33.33);
    }

    #[test]
    fn breakdown_sorted_by_count_then_declaration_order() {
        let mut s = TestSession::new();
        s.append(bad(1, ErrorCategory::Unspecified));
        s.append(bad(2, ErrorCategory::DeviceAbsent));
        s.append(bad(3, ErrorCategory::ConnectionFailure));
        s.append(bad(4, ErrorCategory::DeviceAbsent));
        let order: Vec<_> = s.summary().unwrap().breakdown.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![
                ErrorCategory::DeviceAbsent,
                ErrorCategory::ConnectionFailure,
                ErrorCategory::Unspecified
            ]
        );
    }

    #[test]
    fn persist_is_soft() {
        let mut s = TestSession::new();
        let mut sink = MemorySink::default();
        assert!(!s.persist(&mut sink));
        assert!(sink.writes.borrow().is_empty());

        s.append(ok(1));
        assert!(s.persist(&mut sink));
        assert_eq!(*sink.writes.borrow(), vec![1]);

        let mut broken = MemorySink { fail: true, ..MemorySink::default() };
        assert!(!s.persist(&mut broken));
    }
}
