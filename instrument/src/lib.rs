//! Columnar capture of simulation events.
//!
//! A `tracing` subscriber turns every info-level event into a row of the
//! table named after its target, with one column per field. Tables convert
//! to polars DataFrames for analysis and can be written as parquet or CSV.
//!
//! # Usage
//!
//! ```ignore
//! // In simulation code:
//! tracing::info!(target: "year", year, population, inequality, morale);
//!
//! // In a test:
//! let mut rec = instrument::ScopedRecorder::new("data", "baseline_policy");
//! // ... advance the city ...
//! let years = &rec.get()["year"];
//! ```

mod export;
mod subscriber;
mod table;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use polars::prelude::DataFrame;

pub use export::{Format, write_tables};
pub use subscriber::{TableSubscriber, clear, drain, install};
pub use table::{Cell, Column, Recording, Table};

/// Drain this thread's recording straight into DataFrames.
pub fn drain_to_dataframes() -> HashMap<String, DataFrame> {
    drain().to_dataframes()
}

/// RAII guard around one instrumented run.
///
/// Clears this thread's recording on creation and writes the run's tables to
/// `{parent}/{name}_{unix_secs}/` when dropped, followed by a `_ready`
/// marker once every file is complete.
///
/// ```ignore
/// let mut rec = instrument::ScopedRecorder::new("data/sweeps", "edu_0.05_tax_0.15");
/// // ... run the city ...
/// let dfs = rec.get();
/// // rec drops -> data/sweeps/edu_0_05_tax_0_15_1760000000/*.parquet + _ready
/// ```
pub struct ScopedRecorder {
    run_dir: PathBuf,
    format: Format,
    dfs: Option<HashMap<String, DataFrame>>,
}

impl ScopedRecorder {
    pub fn new(parent: impl Into<PathBuf>, name: &str) -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let run_dir = parent
            .into()
            .join(format!("{}_{secs}", run_label(name)));
        clear();
        install();
        Self {
            run_dir,
            format: Format::Parquet,
            dfs: None,
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Drain recorded events on first call; later calls return the cache.
    pub fn get(&mut self) -> &HashMap<String, DataFrame> {
        self.dfs.get_or_insert_with(drain_to_dataframes)
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }
}

impl Drop for ScopedRecorder {
    fn drop(&mut self) {
        let mut dfs = self.dfs.take().unwrap_or_else(drain_to_dataframes);
        if dfs.is_empty() {
            return;
        }
        if let Err(e) = write_tables(&mut dfs, &self.run_dir, self.format) {
            eprintln!("ScopedRecorder({}): write failed: {e}", self.run_dir.display());
            return;
        }
        if let Err(e) = std::fs::File::create(self.run_dir.join("_ready")) {
            eprintln!("ScopedRecorder({}): no _ready marker: {e}", self.run_dir.display());
        }
    }
}

/// Run names come from lever values (`0.05`), so dots and other separators
/// are flattened for directory names.
fn run_label(name: &str) -> String {
    let label: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    label.chars().take(60).collect()
}
