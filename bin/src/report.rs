//! Report persistence: read previously written tables, write the merged set.
//!
//! Reports live as one `<metric_name>.csv` per table in the output
//! directory. A fresh run merges over whatever is already there: tables
//! recomputed this run replace their files, everything else is preserved.

use polars::prelude::*;
use retail_metrics::{ReportSet, Result};
use std::fs::{self, File};
use std::path::Path;

/// Read any `<name>.csv` tables already present in the report directory.
pub fn read_existing(dir: &Path) -> Result<ReportSet> {
    let mut reports = ReportSet::new();
    if !dir.is_dir() {
        return Ok(reports);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let table = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.clone()))?
            .finish()?;
        reports.insert(name, table);
    }
    Ok(reports)
}

/// Write every table of the set as `<name>.csv` under `dir`.
pub fn write_reports(dir: &Path, reports: &ReportSet) -> Result<()> {
    fs::create_dir_all(dir)?;
    for (name, table) in reports.tables() {
        let path = dir.join(format!("{name}.csv"));
        let mut file = File::create(&path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut table.clone())?;
        println!("  -> {} rows in {}", table.height(), path.display());
    }
    Ok(())
}
