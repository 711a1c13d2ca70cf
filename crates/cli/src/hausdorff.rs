//! hausdorff - directed Hausdorff distances between point spaces
//!
//! Reads `{"x": [...], "y": [...], "offsets": [...]}` and writes the square
//! matrix of directed distances, row `i` holding the distances from space
//! `i`. Without "offsets" every point is its own space.

mod input;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use spacewise_core::api::{QueryOptions, directed_hausdorff_distance};
use spacewise_core::params::{EmptyTargetPolicy, HausdorffParams, NearestStrategy};

use input::{PointColumns, init_runtime, open_output, read_json};

/// Output format for the distance matrix.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// JSON array of rows (default)
    #[default]
    Json,
    /// Whitespace-separated table, six decimals
    Text,
}

/// Nearest-neighbour search for the inner minimum.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Nearest {
    /// Index large target spaces, scan small ones
    #[default]
    Auto,
    /// Always scan
    Scan,
    /// Always use an R-tree
    Indexed,
}

/// Value reported for a non-empty space measured against an empty one.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum EmptyTarget {
    #[default]
    Zero,
    Infinity,
}

/// Compute the matrix of directed Hausdorff distances between spaces.
#[derive(Parser, Debug)]
#[command(name = "hausdorff")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON file with "x", "y" and optional "offsets", or "-" for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Type of output to generate
    #[arg(short = 't', long = "format", value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report max(H(i, j), H(j, i)) instead of the directed distance
    #[arg(long, action = ArgAction::SetTrue)]
    symmetric: bool,

    /// Nearest-neighbour search strategy
    #[arg(long, value_enum, default_value = "auto")]
    nearest: Nearest,

    /// With --nearest auto, index target spaces of at least this many points
    #[arg(long = "index-min-len", default_value = "256")]
    index_min_len: usize,

    /// Split the outer maximisation of spaces at least this large
    #[arg(long = "outer-split-len", default_value_t = HausdorffParams::default().outer_split_len)]
    outer_split_len: usize,

    /// Value for a non-empty space measured against an empty one
    #[arg(long = "empty-target", value_enum, default_value = "zero")]
    empty_target: EmptyTarget,

    /// Compute every cell on the calling thread
    #[arg(long, action = ArgAction::SetTrue)]
    sequential: bool,

    /// Number of worker threads (default: all cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn build_params(args: &Args) -> HausdorffParams {
    let nearest = match args.nearest {
        Nearest::Auto => NearestStrategy::Auto {
            min_target_len: args.index_min_len,
        },
        Nearest::Scan => NearestStrategy::Scan,
        Nearest::Indexed => NearestStrategy::Indexed,
    };
    let empty_target = match args.empty_target {
        EmptyTarget::Zero => EmptyTargetPolicy::Zero,
        EmptyTarget::Infinity => EmptyTargetPolicy::Infinity,
    };
    HausdorffParams::default()
        .with_parallel(!args.sequential)
        .with_nearest(nearest)
        .with_outer_split_len(args.outer_split_len)
        .with_empty_target(empty_target)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_runtime(args.debug, args.threads)?;

    let columns: PointColumns = read_json(&args.input)?;
    let options = QueryOptions {
        hausdorff: build_params(&args),
        ..QueryOptions::default()
    };
    let mut matrix = directed_hausdorff_distance(
        &columns.x,
        &columns.y,
        columns.offsets.as_deref(),
        Some(options),
    )?;
    if args.symmetric {
        matrix = matrix.symmetric();
    }
    log::info!("computed {0}x{0} distance matrix", matrix.dim());

    let mut output = open_output(&args.outfile)?;
    match args.format {
        OutputFormat::Json => {
            // JSON has no infinity; unreachable spaces are written as null.
            let rows: Vec<Vec<Option<f64>>> = matrix
                .rows()
                .map(|row| row.iter().map(|v| v.is_finite().then_some(*v)).collect())
                .collect();
            serde_json::to_writer(&mut output, &rows)?;
            writeln!(output)?;
        }
        OutputFormat::Text => {
            if !matrix.is_empty() {
                writeln!(output, "{matrix}")?;
            }
        }
    }
    output.flush()?;
    Ok(())
}
