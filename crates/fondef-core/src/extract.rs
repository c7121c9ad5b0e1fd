use std::fs::File;
use std::path::PathBuf;

use polars::prelude::*;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::pipeline::Extractor;

/// Reads one CSV export into a DataFrame, column names taken verbatim from
/// the header row.
pub struct CsvExtractor {
    path: PathBuf,
    header_row: usize,
}

impl CsvExtractor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            header_row: 0,
        }
    }

    /// Zero-based index of the line holding the column header; everything
    /// above it is skipped unparsed.
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }
}

impl Extractor for CsvExtractor {
    fn extract(&self) -> Result<DataFrame> {
        if !self.path.exists() {
            return Err(PipelineError::SourceNotFound(self.path.clone()));
        }

        info!(path = %self.path.display(), "extracting data");
        let file = File::open(&self.path)?;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_skip_rows(self.header_row)
            .with_ignore_errors(true)
            .into_reader_with_file_handle(file)
            .finish()?;
        Ok(df)
    }
}
