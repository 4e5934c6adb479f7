pub mod classifier;
pub mod cycle;
pub mod executor;
pub mod poller;
pub mod record;
pub mod runner;
pub mod session;
pub mod sink;
#[cfg(test)]
pub mod testing;

pub use cycle::{CycleRunner, CycleSettings};
pub use executor::CommandExecutor;
pub use runner::StressRunner;
pub use sink::CsvSink;
