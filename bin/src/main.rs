//! CLI for the retail-metrics windowed analytics engine.
//!
//! Provides discovery (`list`, `info`) over the metric registry and a
//! `run` command that ingests a weekly sales CSV, computes every metric,
//! and writes the merged report tables.

mod ingest;
mod report;

use clap::{Parser, Subcommand};
use retail_metrics::{MetricCategory, MetricRegistry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "retail-metrics")]
#[command(about = "Windowed analytics over retail weekly-sales data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available metrics
    List,
    /// Show information about a specific metric
    Info {
        /// Metric name
        metric: String,
    },
    /// Compute all metrics over a sales CSV and write report tables
    Run {
        /// Path to the weekly sales CSV
        #[arg(long)]
        input: PathBuf,
        /// Directory the report CSVs are written to
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let registry = MetricRegistry::with_defaults();

    match cli.command {
        Commands::List => {
            list_metrics(&registry);
            ExitCode::SUCCESS
        }
        Commands::Info { metric } => show_metric_info(&registry, &metric),
        Commands::Run { input, out_dir } => run(&registry, &input, &out_dir),
    }
}

/// List all available metrics grouped by category.
fn list_metrics(registry: &MetricRegistry) {
    let all_info = registry.all_info();

    // Group metrics by category
    let mut by_category: HashMap<MetricCategory, Vec<_>> = HashMap::new();
    for info in all_info {
        by_category.entry(info.category).or_default().push(info);
    }

    println!("Available Metrics ({} total)\n", registry.len());

    // Sort categories for consistent output
    let mut categories: Vec<_> = by_category.keys().copied().collect();
    categories.sort_by_key(|c| format!("{}", c));

    for category in categories {
        println!("{}:", category);
        let mut metrics = by_category.remove(&category).unwrap_or_default();
        metrics.sort_by(|a, b| a.name.cmp(&b.name));

        for info in metrics {
            println!("  {} - {}", info.name, info.description);
        }
        println!();
    }
}

/// Show detailed information about a specific metric.
fn show_metric_info(registry: &MetricRegistry, metric_name: &str) -> ExitCode {
    let all_info = registry.all_info();

    let Some(info) = all_info.iter().find(|m| m.name == metric_name) else {
        eprintln!("Error: Metric '{}' not found", metric_name);
        eprintln!("\nAvailable metrics:");
        let mut names = registry.names();
        names.sort_unstable();
        for name in names {
            eprintln!("  {}", name);
        }
        return ExitCode::FAILURE;
    };

    println!("Metric: {}", info.name);
    println!("Category: {}", info.category);
    println!("Description: {}", info.description);
    println!("Output columns:");
    for column in &info.output_columns {
        println!("  - {}", column);
    }
    ExitCode::SUCCESS
}

/// Ingest the sales CSV, compute every metric, and write merged reports.
fn run(registry: &MetricRegistry, input: &Path, out_dir: &Path) -> ExitCode {
    let facts = match ingest::load_csv(input) {
        Ok(facts) => facts,
        Err(error) => {
            eprintln!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Loaded {} observations from {}",
        facts.height(),
        input.display()
    );

    let computed = registry.compute_all(&facts);
    let mut failed = 0;
    for (name, error) in computed.failures() {
        eprintln!("Metric '{name}' failed: {error}");
        failed += 1;
    }

    let mut merged = match report::read_existing(out_dir) {
        Ok(existing) => existing,
        Err(error) => {
            eprintln!("Error reading existing reports: {error}");
            return ExitCode::FAILURE;
        }
    };
    merged.absorb(computed);

    if let Err(error) = report::write_reports(out_dir, &merged) {
        eprintln!("Error writing reports: {error}");
        return ExitCode::FAILURE;
    }
    println!(
        "Saved {} report tables to {}",
        merged.len(),
        out_dir.display()
    );

    if failed > 0 {
        eprintln!("{failed} metric(s) failed; reports are partial");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_not_empty() {
        let registry = MetricRegistry::with_defaults();
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_all_metrics_have_info() {
        let registry = MetricRegistry::with_defaults();
        let all_info = registry.all_info();

        assert_eq!(all_info.len(), registry.len());

        for info in all_info {
            assert!(!info.name.is_empty());
            assert!(!info.description.is_empty());
            assert!(!info.output_columns.is_empty());
        }
    }

    #[test]
    fn test_metric_categories() {
        let registry = MetricRegistry::with_defaults();
        let all_info = registry.all_info();

        // Verify we have metrics in each category
        let categories: Vec<_> = all_info.iter().map(|m| m.category).collect();

        assert!(categories.contains(&MetricCategory::Trend));
        assert!(categories.contains(&MetricCategory::Ranking));
        assert!(categories.contains(&MetricCategory::Volatility));
        assert!(categories.contains(&MetricCategory::Forecasting));
        assert!(categories.contains(&MetricCategory::Seasonality));
        assert!(categories.contains(&MetricCategory::Concentration));
        assert!(categories.contains(&MetricCategory::Macro));
    }
}
