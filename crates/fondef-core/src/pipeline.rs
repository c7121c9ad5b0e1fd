use polars::prelude::DataFrame;
use tracing::info;

use crate::error::Result;

/// Reads a raw table from some source.
pub trait Extractor {
    fn extract(&self) -> Result<DataFrame>;
}

/// Table-to-table rewrite step.
pub trait Transformer {
    fn transform(&self, df: DataFrame) -> Result<DataFrame>;
}

/// Persists a finished table under the given filename.
pub trait Loader {
    fn load(&self, df: &mut DataFrame, filename: &str) -> Result<()>;
}

/// Composes one extractor, an ordered transformer chain, and one loader.
pub struct EtlPipeline {
    extractor: Box<dyn Extractor>,
    transformers: Vec<Box<dyn Transformer>>,
    loader: Box<dyn Loader>,
}

impl EtlPipeline {
    pub fn new(
        extractor: Box<dyn Extractor>,
        transformers: Vec<Box<dyn Transformer>>,
        loader: Box<dyn Loader>,
    ) -> Self {
        Self {
            extractor,
            transformers,
            loader,
        }
    }

    /// Runs extract -> transform chain -> load. A failing stage aborts the
    /// run before anything is written.
    pub fn run(&self, output_filename: &str) -> Result<()> {
        info!("starting ETL pipeline");

        let mut df = self.extractor.extract()?;
        for transformer in &self.transformers {
            df = transformer.transform(df)?;
        }
        self.loader.load(&mut df, output_filename)?;

        info!("pipeline finished successfully");
        Ok(())
    }
}
