//! Bench command implementation.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

use qbridge_bench::{
    BenchConfig, BenchmarkEntry, CircuitSource, Runner, Sampler, StandardSuite, SweepEvent,
    SweepPlan, SweepReport,
};
use qbridge_convert::Converter;

use super::common::default_registry;

/// Arguments of `qbridge bench`. Flags override the configuration file and
/// `QBRIDGE_*` environment variables.
#[derive(Args, Debug)]
pub struct BenchArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Benchmark to run (repeatable); all benchmarks if omitted
    #[arg(short = 'b', long = "benchmark")]
    pub benchmarks: Vec<String>,

    /// Smallest qubit count
    #[arg(long)]
    pub min_qubits: Option<usize>,

    /// Largest qubit count
    #[arg(long)]
    pub max_qubits: Option<usize>,

    /// Simulation backend (statevector, tensornetwork, densitymatrix, mps)
    #[arg(long)]
    pub backend: Option<String>,

    /// Trials averaged per measurement
    #[arg(short, long)]
    pub shots: Option<usize>,

    /// Include conversion in the timed region
    #[arg(long)]
    pub measure_conversion: bool,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

/// Execute the bench command.
pub fn execute(args: &BenchArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let suite = StandardSuite::new().with_seed(config.seed);
    let plan = SweepPlan::from_config(&config, &suite)?;

    let runner = Runner::new(
        Converter::standard(),
        suite,
        default_registry(config.seed),
        Sampler::new().with_interval(config.poll_interval()),
    );
    let total: usize = runner
        .schedule(&plan)?
        .iter()
        .map(|(_, sizes)| sizes.len())
        .sum();

    println!(
        "{} Benchmarking {} configurations on {} ({} shots each)",
        style("→").cyan().bold(),
        total,
        style(plan.backend).yellow(),
        plan.shots
    );
    info!("Sweep plan: {:?}", plan);

    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("=> "),
    );

    let report = runner.sweep(&plan, |event| match event {
        SweepEvent::Started {
            benchmark,
            num_qubits,
        } => progress.set_message(format!("{benchmark} @ {num_qubits} qubits")),
        SweepEvent::Completed { .. } => progress.inc(1),
        SweepEvent::Failed {
            benchmark,
            num_qubits,
            error,
        } => {
            progress.println(format!(
                "  {} {benchmark} @ {num_qubits} qubits: {error}",
                style("✗").red().bold()
            ));
            progress.inc(1);
        }
    })?;
    progress.finish_and_clear();

    print_report(&report);

    if let Some(path) = &args.export {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        println!("  Report: {}", style(path.display()).green());
    }

    if report.completed() == 0 && !report.failures.is_empty() {
        anyhow::bail!("all {} configurations failed", report.failures.len());
    }
    Ok(())
}

/// File, then environment, then command-line flags.
fn resolve_config(args: &BenchArgs) -> Result<BenchConfig> {
    let mut config = BenchConfig::load(args.config.as_deref())?;

    if let Some(shots) = args.shots {
        config.shots = shots;
    }
    if let Some(backend) = &args.backend {
        config.backend = backend.clone();
    }
    if args.measure_conversion {
        config.measure_conversion = true;
    }
    if let Some(max) = args.max_qubits {
        config.max_qubits = max;
    }
    if !args.benchmarks.is_empty() {
        config.benchmarks = args
            .benchmarks
            .iter()
            .map(|name| BenchmarkEntry::new(name.as_str()))
            .collect();
    }
    if args.min_qubits.is_some() || args.max_qubits.is_some() {
        if config.benchmarks.is_empty() {
            config.benchmarks = StandardSuite::new()
                .names()
                .into_iter()
                .map(|name| BenchmarkEntry::new(name.as_str()))
                .collect();
        }
        for entry in &mut config.benchmarks {
            if args.min_qubits.is_some() {
                entry.min_qubits = args.min_qubits;
            }
            if args.max_qubits.is_some() {
                entry.max_qubits = args.max_qubits;
            }
        }
    }

    config.validate()?;
    Ok(config)
}

fn print_report(report: &SweepReport) {
    println!(
        "\n{} Completed {} runs ({} failed)",
        style("✓").green().bold(),
        report.completed(),
        report.failures.len()
    );

    for (name, qubits) in &report.qubits {
        println!("\n  {}", style(name).cyan().bold());
        println!("  {:>7}  {:>12}  {:>12}", "qubits", "time (s)", "peak (MB)");
        let times = report.time.get(name).map(Vec::as_slice).unwrap_or_default();
        let memory = report.memory.get(name).map(Vec::as_slice).unwrap_or_default();
        for ((n, t), m) in qubits.iter().zip(times).zip(memory) {
            println!("  {n:>7}  {t:>12.6}  {m:>12.2}");
        }
    }
}
