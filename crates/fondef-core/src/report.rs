use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use plotly::common::color::Rgb;
use plotly::common::{Line, Mode, Title};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};
use polars::prelude::*;
use tracing::info;

use crate::config::{Config, ERA_A_OUTPUT, ERA_B_OUTPUT};
use crate::error::Result;
use crate::extract::CsvExtractor;
use crate::pipeline::Extractor;

/// Rebuilds the projects-per-year line chart from both processed outputs.
/// The chart is an external consumer of the unified schema; it re-reads the
/// CSVs rather than sharing state with the pipelines.
pub fn generate_report(config: &Config) -> Result<PathBuf> {
    let era_a = CsvExtractor::new(config.processed_data_dir.join(ERA_A_OUTPUT)).extract()?;
    let era_b = CsvExtractor::new(config.processed_data_dir.join(ERA_B_OUTPUT)).extract()?;

    let counts = project_counts_by_year(&[era_a, era_b])?;

    fs::create_dir_all(&config.docs_dir)?;
    let output_path = config.report_path();
    render_chart(&counts, &output_path)?;

    info!(path = %output_path.display(), "report written");
    Ok(output_path)
}

/// Counts projects per contest year across the given frames, ignoring the
/// placeholder years at or below 1990.
pub fn project_counts_by_year(frames: &[DataFrame]) -> Result<DataFrame> {
    let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
    for df in frames {
        let years = df.column("year")?.cast(&DataType::Int64)?;
        for year in years.i64()?.iter().flatten() {
            if year > 1990 {
                *counts.entry(year).or_insert(0) += 1;
            }
        }
    }

    let years: Vec<i64> = counts.keys().copied().collect();
    let totals: Vec<u32> = counts.values().copied().collect();
    Ok(DataFrame::new(vec![
        Series::new("year".into(), years).into(),
        Series::new("count".into(), totals).into(),
    ])?)
}

fn render_chart(counts: &DataFrame, output_path: &Path) -> Result<()> {
    let years: Vec<i64> = counts.column("year")?.i64()?.iter().flatten().collect();
    let totals: Vec<u32> = counts.column("count")?.u32()?.iter().flatten().collect();

    let trace = Scatter::new(years, totals)
        .mode(Mode::LinesMarkers)
        .line(Line::new().color(Rgb::new(230, 57, 70)).width(3.0));

    let layout = Layout::new()
        .title(Title::with_text(
            "Evolución de la Cantidad de Proyectos por Año",
        ))
        .x_axis(Axis::new().title(Title::with_text("Año")))
        .y_axis(Axis::new().title(Title::with_text("N° de Proyectos")));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot.write_html(output_path);
    Ok(())
}
