//! jstrip I/O - File pipeline for key stripping
//!
//! This crate wraps the core filter with file handling:
//!
//! - Reading and parsing the whole input before any output is produced
//! - Output path derivation
//! - Atomic output: the document is written to a temporary sibling file and
//!   renamed into place only after it is complete

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod output;

// Re-export commonly used types
pub use error::{ErrorKind, IoPipelineError, Result};
pub use jstrip_core::{ExclusionSet, FilterError, FilterOptions};
pub use output::{derive_output_path, NamingRule, OutputTarget, FILTERED_SUFFIX};

use serde_json::Value;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Request describing one filtering run
#[derive(Debug, Clone)]
pub struct FilterRequest {
    /// Input JSON file
    pub input: PathBuf,
    /// Key names to drop
    pub excluded: ExclusionSet,
    /// Output destination
    pub output: OutputTarget,
    /// Output formatting
    pub options: FilterOptions,
    /// Count matches without writing an output file
    pub dry_run: bool,
}

impl FilterRequest {
    /// Request with default output naming and formatting
    pub fn new(input: impl Into<PathBuf>, excluded: ExclusionSet) -> Self {
        Self {
            input: input.into(),
            excluded,
            output: OutputTarget::default(),
            options: FilterOptions::default(),
            dry_run: false,
        }
    }

    /// Output path this request resolves to
    pub fn output_path(&self) -> PathBuf {
        self.output.resolve(&self.input)
    }
}

/// Outcome of a filtering run
#[derive(Debug, Clone)]
pub struct FilterSummary {
    /// Input path
    pub input: PathBuf,
    /// Output path (not created for dry runs)
    pub output: PathBuf,
    /// Distinct excluded key names
    pub excluded_keys: usize,
    /// Object members removed, outermost match only
    pub removed: u64,
    /// Size of the input file
    pub bytes_read: u64,
    /// Size of the written output (0 for dry runs)
    pub bytes_written: u64,
    /// Time spent reading and parsing
    pub parse_duration: Duration,
    /// Time spent filtering and writing
    pub filter_duration: Duration,
    /// Whether this was a dry run
    pub dry_run: bool,
}

/// Run a filtering request end to end
///
/// The input is parsed completely before anything is written, so malformed
/// input never produces an output file. A failure while writing leaves the
/// previous contents of the output path untouched.
pub fn execute_filter(request: FilterRequest) -> Result<FilterSummary> {
    let output = request.output_path();
    let FilterRequest {
        input,
        excluded,
        options,
        dry_run,
        ..
    } = request;

    let parse_start = Instant::now();
    let (root, bytes_read) = read_document(&input)?;
    let parse_duration = parse_start.elapsed();

    let filter_start = Instant::now();
    let (removed, bytes_written) = if dry_run {
        (jstrip_core::count_matches(&root, &excluded), 0)
    } else {
        write_atomically(&output, |writer| {
            jstrip_core::filter(&root, &excluded, writer, &options)
        })?
    };
    let filter_duration = filter_start.elapsed();

    info!(
        input = %input.display(),
        output = %output.display(),
        removed,
        bytes_written,
        dry_run,
        "filter complete"
    );

    Ok(FilterSummary {
        input,
        output,
        excluded_keys: excluded.len(),
        removed,
        bytes_read,
        bytes_written,
        parse_duration,
        filter_duration,
        dry_run,
    })
}

/// Read and parse a JSON document, returning it with its size in bytes
pub fn read_document(path: &Path) -> Result<(Value, u64)> {
    let bytes = fs::read(path).map_err(|source| IoPipelineError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read input");

    let value = serde_json::from_slice(&bytes).map_err(|source| IoPipelineError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "parsed input");

    Ok((value, bytes.len() as u64))
}

/// Write through a temporary sibling of `path`, then rename it into place
///
/// The temporary file is deleted if `write` fails or the rename fails.
/// A replaced file keeps its permissions; a new file gets the mode a plain
/// create would give it under the current umask.
fn write_atomically<F>(path: &Path, write: F) -> Result<(u64, u64)>
where
    F: FnOnce(&mut BufWriter<&fs::File>) -> jstrip_core::Result<u64>,
{
    let dir = output::output_dir(path);
    let mut builder = tempfile::Builder::new();
    builder.prefix(".jstrip-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp = builder
        .tempfile_in(dir)
        .map_err(|source| IoPipelineError::CreateOutput {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(temp = %temp.path().display(), "writing to temporary file");

    let write_err = |source: jstrip_core::FilterError| IoPipelineError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Ok(existing) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| write_err(e.into()))?;
    }

    let removed = {
        let mut writer = BufWriter::new(temp.as_file());
        let removed = write(&mut writer).map_err(write_err)?;
        writer.flush().map_err(|e| write_err(e.into()))?;
        removed
    };
    temp.as_file()
        .sync_all()
        .map_err(|e| write_err(e.into()))?;
    let bytes_written = temp
        .as_file()
        .metadata()
        .map_err(|e| write_err(e.into()))?
        .len();

    temp.persist(path).map_err(|err| IoPipelineError::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    debug!(path = %path.display(), bytes_written, "output persisted");

    Ok((removed, bytes_written))
}
