pub mod config;
pub mod error;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod transform;

pub use error::{PipelineError, Result};
pub use pipeline::{EtlPipeline, Extractor, Loader, Transformer};
