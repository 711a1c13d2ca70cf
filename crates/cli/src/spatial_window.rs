//! spatial-window - keep the points strictly inside a rectangle
//!
//! Reads `{"x": [...], "y": [...]}` and writes the retained points in the
//! same shape, preserving input order.

mod input;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use serde::Serialize;
use spacewise_core::api::{QueryOptions, spatial_window};
use spacewise_core::params::WindowParams;

use input::{PointColumns, init_runtime, open_output, read_json};

/// Keep the points with min_x < x < max_x and min_y < y < max_y.
#[derive(Parser, Debug)]
#[command(name = "spatial-window")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON file with "x" and "y" arrays, or "-" for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Lower x bound (exclusive)
    #[arg(long = "min-x", allow_hyphen_values = true)]
    min_x: f64,

    /// Upper x bound (exclusive)
    #[arg(long = "max-x", allow_hyphen_values = true)]
    max_x: f64,

    /// Lower y bound (exclusive)
    #[arg(long = "min-y", allow_hyphen_values = true)]
    min_y: f64,

    /// Upper y bound (exclusive)
    #[arg(long = "max-y", allow_hyphen_values = true)]
    max_y: f64,

    /// Inputs with at least this many points are filtered in parallel
    #[arg(long = "parallel-min-len", default_value_t = WindowParams::default().parallel_min_len)]
    parallel_min_len: usize,

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

#[derive(Serialize)]
struct Retained {
    x: Vec<f64>,
    y: Vec<f64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_runtime(args.debug, args.threads)?;

    let columns: PointColumns = read_json(&args.input)?;
    if columns.offsets.is_some() {
        log::warn!("ignoring \"offsets\": the window filter does not use spaces");
    }

    let options = QueryOptions {
        window: WindowParams::default().with_parallel_min_len(args.parallel_min_len),
        ..QueryOptions::default()
    };
    let (x, y) = spatial_window(
        args.min_x,
        args.max_x,
        args.min_y,
        args.max_y,
        &columns.x,
        &columns.y,
        Some(options),
    )?;
    log::info!("kept {} of {} points", x.len(), columns.x.len());

    let mut output = open_output(&args.outfile)?;
    serde_json::to_writer(&mut output, &Retained { x, y })?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
