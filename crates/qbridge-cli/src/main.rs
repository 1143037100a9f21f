//! qbridge Command-Line Interface
//!
//! Converts OpenQASM circuits into the target instruction vocabulary and
//! benchmarks the converted circuits for time and peak memory.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::bench::BenchArgs;
use commands::{bench, convert, list, version};

/// qbridge - circuit conversion and time/memory benchmarking
#[derive(Parser)]
#[command(name = "qbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an OpenQASM circuit into the target vocabulary
    Convert {
        /// Input file (OpenQASM 2 or 3)
        #[arg(short, long)]
        input: PathBuf,

        /// Print the intermediate exchange document instead
        #[arg(long)]
        exchange: bool,

        /// Output file (.json writes the target circuit as JSON); stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Measure time and peak memory of benchmark circuits
    Bench(BenchArgs),

    /// List benchmarks and simulation backends
    List,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert {
            input,
            exchange,
            output,
        } => convert::execute(&input, exchange, output.as_deref()),

        Commands::Bench(args) => bench::execute(&args),

        Commands::List => {
            list::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert_minimal() {
        let cli = Cli::try_parse_from(["qbridge", "convert", "-i", "bell.qasm"]).unwrap();
        match cli.command {
            Commands::Convert {
                input,
                exchange,
                output,
            } => {
                assert_eq!(input, PathBuf::from("bell.qasm"));
                assert!(!exchange);
                assert!(output.is_none());
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_parse_convert_exchange_to_file() {
        let cli = Cli::try_parse_from([
            "qbridge", "convert", "-i", "in.qasm", "--exchange", "-o", "out.qasm",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Convert { exchange: true, output: Some(_), .. }
        ));
    }

    #[test]
    fn test_parse_convert_missing_input() {
        assert!(Cli::try_parse_from(["qbridge", "convert"]).is_err());
    }

    #[test]
    fn test_parse_bench_defaults() {
        let cli = Cli::try_parse_from(["qbridge", "bench"]).unwrap();
        match cli.command {
            Commands::Bench(args) => {
                assert!(args.config.is_none());
                assert!(args.benchmarks.is_empty());
                assert!(args.shots.is_none());
                assert!(!args.measure_conversion);
            }
            _ => panic!("expected bench"),
        }
    }

    #[test]
    fn test_parse_bench_all_args() {
        let cli = Cli::try_parse_from([
            "qbridge",
            "bench",
            "-c",
            "bench.yaml",
            "-b",
            "ghz",
            "-b",
            "qft",
            "--min-qubits",
            "2",
            "--max-qubits",
            "6",
            "--backend",
            "statevector",
            "--shots",
            "3",
            "--measure-conversion",
            "--export",
            "report.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Bench(args) => {
                assert_eq!(args.config, Some(PathBuf::from("bench.yaml")));
                assert_eq!(args.benchmarks, ["ghz", "qft"]);
                assert_eq!(args.min_qubits, Some(2));
                assert_eq!(args.max_qubits, Some(6));
                assert_eq!(args.backend.as_deref(), Some("statevector"));
                assert_eq!(args.shots, Some(3));
                assert!(args.measure_conversion);
                assert_eq!(args.export, Some(PathBuf::from("report.json")));
            }
            _ => panic!("expected bench"),
        }
    }

    #[test]
    fn test_parse_bench_rejects_non_numeric_shots() {
        assert!(Cli::try_parse_from(["qbridge", "bench", "--shots", "many"]).is_err());
    }

    #[test]
    fn test_parse_verbose_counts() {
        let cli = Cli::try_parse_from(["qbridge", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["qbridge", "version", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_no_subcommand() {
        assert!(Cli::try_parse_from(["qbridge"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["qbridge", "compile"]).is_err());
    }
}
