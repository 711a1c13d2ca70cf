//! Shared input/output plumbing for the command line tools.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Points as parallel columns, optionally grouped into spaces.
#[derive(Debug, Deserialize)]
pub struct PointColumns {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub offsets: Option<Vec<usize>>,
}

/// Reads JSON from `path`, or from stdin when the path is "-".
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if path.as_os_str() == "-" {
        let mut data = String::new();
        io::stdin()
            .read_to_string(&mut data)
            .context("failed to read stdin")?;
        return serde_json::from_str(&data).context("invalid JSON on stdin");
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Opens `outfile` for writing, or stdout when it is "-".
pub fn open_output(outfile: &str) -> Result<Box<dyn Write>> {
    if outfile == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(outfile).with_context(|| format!("failed to create {outfile}"))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Sets up logging and the global rayon pool.
pub fn init_runtime(debug: bool, threads: Option<usize>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        log::debug!("using {threads} worker threads");
    }
    Ok(())
}
