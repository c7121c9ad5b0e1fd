use std::fs;

use polars::prelude::*;
use tempfile::tempdir;

use fondef_core::config::{Config, ERA_A_OUTPUT, ERA_B_OUTPUT};
use fondef_core::report::{generate_report, project_counts_by_year};

#[test]
fn counts_projects_per_year_across_eras() -> PolarsResult<()> {
    let era_a = DataFrame::new(vec![
        Series::new("project_code".into(), vec!["Ab01-0001", "Ab01-0002", "Ab03-0001"]).into(),
        Series::new("year".into(), vec![2001i64, 2001, 2003]).into(),
    ])?;
    let era_b = DataFrame::new(vec![
        Series::new("project_code".into(), vec!["Id14-0001", "Id00-0002"]).into(),
        Series::new("year".into(), vec![2014i64, 0]).into(),
    ])?;

    let counts = project_counts_by_year(&[era_a, era_b]).unwrap();

    let years: Vec<i64> = counts.column("year")?.i64()?.iter().flatten().collect();
    let totals: Vec<u32> = counts.column("count")?.u32()?.iter().flatten().collect();
    assert_eq!(years, vec![2001, 2003, 2014]);
    assert_eq!(totals, vec![2, 1, 1]);
    Ok(())
}

#[test]
fn generate_report_renders_chart_from_processed_outputs() {
    let dir = tempdir().unwrap();
    let config = Config {
        raw_data_dir: dir.path().join("raw"),
        processed_data_dir: dir.path().join("processed"),
        docs_dir: dir.path().join("docs"),
    };

    fs::create_dir_all(&config.processed_data_dir).unwrap();
    fs::write(
        config.processed_data_dir.join(ERA_A_OUTPUT),
        "project_code,year\nAb01-0001,2001\nAb02-0002,2002\n",
    )
    .unwrap();
    fs::write(
        config.processed_data_dir.join(ERA_B_OUTPUT),
        "project_code,year\nId14-0001,2014\n",
    )
    .unwrap();

    let path = generate_report(&config).unwrap();
    assert!(path.exists());
    let html = fs::read_to_string(path).unwrap();
    assert!(html.contains("Proyectos"));
}

#[test]
fn generate_report_fails_when_outputs_are_missing() {
    let dir = tempdir().unwrap();
    let config = Config {
        raw_data_dir: dir.path().join("raw"),
        processed_data_dir: dir.path().join("processed"),
        docs_dir: dir.path().join("docs"),
    };

    assert!(generate_report(&config).is_err());
}
