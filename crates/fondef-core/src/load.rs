use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::pipeline::Loader;

/// Spreadsheet tools only pick up accented text when the file starts with a
/// byte-order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes a table as CSV into a fixed output directory, creating it when
/// absent. Existing files are overwritten.
pub struct CsvLoader {
    output_dir: PathBuf,
}

impl CsvLoader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl Loader for CsvLoader {
    fn load(&self, df: &mut DataFrame, filename: &str) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(filename);
        info!(path = %output_path.display(), "saving processed data");

        let mut file = File::create(&output_path)?;
        file.write_all(UTF8_BOM)?;
        CsvWriter::new(&mut file).include_header(true).finish(df)?;

        info!("save complete");
        Ok(())
    }
}
