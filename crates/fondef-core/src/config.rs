use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Raw source exports as published by the funding agency, one per contest era.
pub const ERA_A_SOURCE: &str = "Proyectos-ID-Adjudicados-2000-2011.csv";
pub const ERA_B_SOURCE: &str = "Proyectos-IDeA-Adjudicados-2012-2017-1.csv";

/// The 2000-2011 export carries four banner lines before the header row.
pub const ERA_A_HEADER_ROW: usize = 4;

pub const ERA_A_OUTPUT: &str = "fondef_2000_2011_processed.csv";
pub const ERA_B_OUTPUT: &str = "fondef_2012_2017_processed.csv";

pub const REPORT_FILENAME: &str = "evolucion_proyectos_anio.html";

/// Directory layout for a pipeline run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub raw_data_dir: PathBuf,
    pub processed_data_dir: PathBuf,
    pub docs_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_data_dir: PathBuf::from("data/raw"),
            processed_data_dir: PathBuf::from("data/processed"),
            docs_dir: PathBuf::from("docs"),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file, falling back to the default
    /// layout when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn era_a_source(&self) -> PathBuf {
        self.raw_data_dir.join(ERA_A_SOURCE)
    }

    pub fn era_b_source(&self) -> PathBuf {
        self.raw_data_dir.join(ERA_B_SOURCE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.docs_dir.join(REPORT_FILENAME)
    }
}
