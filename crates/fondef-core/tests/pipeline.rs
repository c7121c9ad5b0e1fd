use std::fs;

use polars::prelude::*;
use tempfile::tempdir;

use fondef_core::extract::CsvExtractor;
use fondef_core::load::CsvLoader;
use fondef_core::pipeline::{EtlPipeline, Extractor, Loader};
use fondef_core::transform::{CleaningTransformer, Fondef2000Transformer};
use fondef_core::PipelineError;

#[test]
fn extractor_fails_before_reading_missing_files() {
    let err = CsvExtractor::new("data/raw/does-not-exist.csv")
        .extract()
        .unwrap_err();
    assert!(matches!(err, PipelineError::SourceNotFound(_)));
}

#[test]
fn loader_round_trip_preserves_rows_and_accents() -> PolarsResult<()> {
    let dir = tempdir().unwrap();
    let mut df = DataFrame::new(vec![
        Series::new("project_code".into(), vec!["Ab01-0001", "Ab01-0002"]).into(),
        Series::new("title".into(), vec!["Diseño de riego", "Año de prueba"]).into(),
        Series::new("director".into(), vec!["María Ñuñez", "José Álvarez"]).into(),
    ])?;

    CsvLoader::new(dir.path())
        .load(&mut df, "round_trip.csv")
        .unwrap();

    let reread = CsvExtractor::new(dir.path().join("round_trip.csv"))
        .extract()
        .unwrap();
    assert_eq!(reread.height(), df.height());

    let names: Vec<&str> = reread
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(names, vec!["project_code", "title", "director"]);

    let directors = reread.column("director")?.str()?;
    assert_eq!(directors.get(0), Some("María Ñuñez"));
    assert_eq!(directors.get(1), Some("José Álvarez"));
    let titles = reread.column("title")?.str()?;
    assert_eq!(titles.get(1), Some("Año de prueba"));
    Ok(())
}

#[test]
fn loader_overwrites_existing_outputs() -> PolarsResult<()> {
    let dir = tempdir().unwrap();
    let loader = CsvLoader::new(dir.path());

    let mut first = DataFrame::new(vec![
        Series::new("project_code".into(), vec!["Ab01-0001", "Ab01-0002"]).into()
    ])?;
    loader.load(&mut first, "out.csv").unwrap();

    let mut second =
        DataFrame::new(vec![
            Series::new("project_code".into(), vec!["Ab02-0001"]).into()
        ])?;
    loader.load(&mut second, "out.csv").unwrap();

    let reread = CsvExtractor::new(dir.path().join("out.csv"))
        .extract()
        .unwrap();
    assert_eq!(reread.height(), 1);
    Ok(())
}

#[test]
fn era_a_pipeline_end_to_end_drops_pre_1991_rows() -> PolarsResult<()> {
    let dir = tempdir().unwrap();
    let raw_path = dir.path().join("era_a.csv");
    let raw = "\
FONDEF,,,,,,,,,
Proyectos adjudicados,,,,,,,,,
,,,,,,,,,
,,,,,,,,,
CODIGO,AÑO CONCURSO,TITULO,DIRECTOR GENERAL,MONTO ADJ. FONDEF,FECHA INICIO,FECHA TERMINO,PALABRA CLAVE 1,PALABRA CLAVE 2,PALABRA CLAVE 3
AB01-0001,2001,riego tecnificado,ana rojas,1.000.000,01-03-2001,01-03-2004,riego,,
AB02-0002,2002,software de gestión escolar,luis soto,2.000.000,01-04-2002,01-04-2005,software,aula,
AB85-0003,1985,proyecto placeholder,sin director,500,01-01-1985,01-01-1986,,,
AB03-0004,2003,engorda de salmón en el sur,rosa díaz,3.000.000,01-05-2003,01-05-2006,salmon,,
";
    fs::write(&raw_path, raw).unwrap();

    let processed_dir = dir.path().join("processed");
    let pipeline = EtlPipeline::new(
        Box::new(CsvExtractor::new(&raw_path).with_header_row(4)),
        vec![Box::new(Fondef2000Transformer), Box::new(CleaningTransformer)],
        Box::new(CsvLoader::new(&processed_dir)),
    );
    pipeline.run("era_a_processed.csv").unwrap();

    let output = CsvExtractor::new(processed_dir.join("era_a_processed.csv"))
        .extract()
        .unwrap();
    assert_eq!(output.height(), 3);

    let years = output.column("year")?.i64()?;
    assert!(years.iter().flatten().all(|year| year > 1990));

    let codes = output.column("project_code")?.str()?;
    assert!(codes.iter().flatten().all(|code| code != "Ab85-0003"));

    let areas = output.column("area")?.str()?;
    assert_eq!(areas.get(0), Some("Agropecuaria"));
    assert_eq!(areas.get(1), Some("Tic"));
    assert_eq!(areas.get(2), Some("Pesca Y Acuicultura"));
    Ok(())
}
