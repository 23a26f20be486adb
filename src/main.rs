mod chart;
mod color;
mod data;
mod pipeline;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use chart::ChartConfig;
use data::aggregate::SkippedFile;
use pipeline::{RunConfig, RunOutcome, NO_DATA_GUIDANCE};

/// Summarise converged drag/lift coefficients and plot Cd, Cl and L/D
/// against angle of attack for every Reynolds number.
#[derive(Debug, Parser)]
#[command(name = "polar-report", version, about)]
struct Cli {
    /// Directory holding `{drag|lift}_Re<n>_aoa<n>.csv` case files.
    #[arg(short, long, env = "POLAR_INPUT_DIR", default_value = "results")]
    input_dir: PathBuf,

    /// Where the summary table and charts go. Defaults to the input directory.
    #[arg(short, long, env = "POLAR_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Re-render the charts from an existing summary CSV instead of scanning case files.
    #[arg(long, value_name = "CSV", conflicts_with = "no_plots")]
    from_summary: Option<PathBuf>,

    /// Only write the summary table.
    #[arg(long)]
    no_plots: bool,

    /// Chart width in pixels.
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(100..))]
    width: u32,

    /// Chart height in pixels.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(100..))]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let output_dir = cli.output_dir.clone().unwrap_or_else(|| cli.input_dir.clone());
    let chart = ChartConfig {
        width: cli.width,
        height: cli.height,
    };

    if let Some(summary_csv) = &cli.from_summary {
        match pipeline::replot(summary_csv, &output_dir, &chart)? {
            None => println!("\n{NO_DATA_GUIDANCE}"),
            Some(charts) => {
                for path in &charts {
                    println!("Chart saved to: {}", path.display());
                }
                println!("Re-plot completed successfully.");
            }
        }
        return Ok(());
    }

    let config = RunConfig {
        input_dir: cli.input_dir,
        output_dir,
        chart,
        skip_plots: cli.no_plots,
    };

    match pipeline::run(&config)? {
        RunOutcome::NoData { skipped } => {
            print_skipped(&skipped);
            println!("\n{NO_DATA_GUIDANCE}");
        }
        RunOutcome::Completed(report) => {
            print_skipped(&report.skipped);
            log::info!("{} record(s) summarised", report.records);
            println!("\nSummary data saved to: {}", report.summary_path.display());
            if config.skip_plots {
                println!("Plots skipped. Processing completed successfully.");
            } else {
                println!(
                    "{} plot(s) saved to {}. Processing completed successfully.",
                    report.charts.len(),
                    config.output_dir.display()
                );
            }
        }
    }
    Ok(())
}

fn print_skipped(skipped: &[SkippedFile]) {
    for file in skipped {
        println!("{file}");
    }
}
