use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tadseg::model::FitOptions;
use tadseg::{BreakpointSet, ContactMatrices, ContactMatrix, LikelihoodMatrix, SegmentationConfig, Segmenter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tadseg", about = "TAD breakpoint detection on Hi-C contact matrices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find breakpoints across one or more replicate matrices.
    Call(SegmentArgs),
    /// Print the segment log-likelihood matrix (NaN where not evaluated).
    Likelihood(SegmentArgs),
}

#[derive(Args, Debug)]
struct SegmentArgs {
    /// Replicate matrices: one row per line, whitespace or comma separated.
    #[arg(required = true)]
    matrices: Vec<PathBuf>,
    /// Only consider local maxima of the single-breakpoint profile.
    #[arg(long)]
    fast: bool,
    /// Newton-Raphson iterations allowed per fit.
    #[arg(long, default_value_t = 1000)]
    max_iterations: usize,
    /// Convergence tolerance on the squared score norm.
    #[arg(long, default_value_t = 1e-6)]
    tolerance: f64,
}

impl SegmentArgs {
    fn segmenter(&self) -> Segmenter {
        let fit = FitOptions::default()
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance);
        Segmenter::new(
            SegmentationConfig::default()
                .with_fast(self.fast)
                .with_fit_options(fit),
        )
    }

    fn load(&self) -> Result<ContactMatrices> {
        let replicates = self
            .matrices
            .iter()
            .map(|path| read_matrix_file(path))
            .collect::<Result<Vec<_>>>()?;
        ContactMatrices::new(replicates).context("replicate matrices are not compatible")
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Call(args) => run_call(&args)?,
        Commands::Likelihood(args) => run_likelihood(&args)?,
    }

    Ok(())
}

fn run_call(args: &SegmentArgs) -> Result<()> {
    let matrices = args.load()?;
    let result = args
        .segmenter()
        .run(&matrices)
        .context("segmentation failed")?;

    println!("{}", join_flags(&result.breakpoints));
    println!("breakpoints={}", join_positions(&result.breakpoints));

    for (idx, domain) in result.breakpoints.domains().iter().enumerate() {
        println!("domain {}\tbins=[{}, {}]", idx + 1, domain.start(), domain.end());
    }
    println!("log_likelihood={:.4}", result.log_likelihood);

    Ok(())
}

fn join_flags(breakpoints: &BreakpointSet) -> String {
    let flags: Vec<String> = breakpoints.as_slice().iter().map(u8::to_string).collect();
    flags.join("\t")
}

fn join_positions(breakpoints: &BreakpointSet) -> String {
    let positions: Vec<String> = breakpoints
        .positions()
        .iter()
        .map(usize::to_string)
        .collect();
    positions.join(",")
}

fn run_likelihood(args: &SegmentArgs) -> Result<()> {
    let matrices = args.load()?;
    let (candidates, llik) = args
        .segmenter()
        .likelihood_matrix(&matrices)
        .context("likelihood computation failed")?;

    let bins: Vec<String> = candidates.iter().map(|bin| bin.to_string()).collect();
    println!("# candidates: {}", bins.join(","));
    print_likelihood(&llik);

    Ok(())
}

fn print_likelihood(llik: &LikelihoodMatrix) {
    for row in llik.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|value| {
                if value.is_nan() {
                    "NaN".to_string()
                } else {
                    format!("{:.4}", value)
                }
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
}

fn read_matrix_file(path: &Path) -> Result<ContactMatrix> {
    let file = File::open(path)
        .with_context(|| format!("failed to open matrix file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty())
            .map(|field| {
                field.parse::<f64>().with_context(|| {
                    format!(
                        "invalid count '{}' on line {} of {}",
                        field,
                        line_no + 1,
                        path.display()
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }

    ContactMatrix::from_rows(rows)
        .with_context(|| format!("invalid matrix in {}", path.display()))
}
