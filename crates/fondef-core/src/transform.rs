use std::collections::HashSet;

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::pipeline::Transformer;
use crate::schema::{align_to_unified, infer_area};

/// Column renames for the 2000-2011 export.
const ERA_A_RENAMES: [(&str, &str); 7] = [
    ("CODIGO", "project_code"),
    ("AÑO CONCURSO", "year"),
    ("TITULO", "title"),
    ("DIRECTOR GENERAL", "director"),
    ("MONTO ADJ. FONDEF", "amount"),
    ("FECHA INICIO", "start_date"),
    ("FECHA TERMINO", "end_date"),
];

const ERA_A_KEYWORD_COLUMNS: [&str; 3] = [
    "PALABRA CLAVE 1",
    "PALABRA CLAVE 2",
    "PALABRA CLAVE 3",
];

/// Column renames for the 2012-2017 export. The area header carries a
/// trailing space in the source file.
const ERA_B_RENAMES: [(&str, &str); 5] = [
    ("Código", "project_code"),
    ("Concurso", "contest_name"),
    ("Título", "title"),
    ("Director General", "director"),
    ("Área ", "area"),
];

/// Maps the 2000-2011 export onto the unified grant schema. Keywords are
/// joined from the three keyword columns and the research area is inferred
/// from keywords plus title.
pub struct Fondef2000Transformer;

impl Transformer for Fondef2000Transformer {
    fn transform(&self, df: DataFrame) -> Result<DataFrame> {
        info!("transforming Fondef 2000-2011 dataset");
        let mut df = df;
        rename_columns(&mut df, &ERA_A_RENAMES)?;

        let keywords = join_keyword_columns(&df)?;
        let areas = infer_areas(&df, &keywords)?;

        df.with_column(Series::new("keywords".into(), keywords))?;
        df.with_column(Series::new("area".into(), areas))?;

        align_to_unified(df)
    }
}

/// Maps the 2012-2017 export onto the unified grant schema. This era's source
/// has no keyword, amount, or date columns; the contest year is embedded in
/// the project code instead.
pub struct Fondef2012Transformer;

impl Transformer for Fondef2012Transformer {
    fn transform(&self, df: DataFrame) -> Result<DataFrame> {
        info!("transforming Fondef 2012-2017 dataset");
        let mut df = df;
        rename_columns(&mut df, &ERA_B_RENAMES)?;

        let years: Vec<Option<i64>> = match df.column("project_code") {
            Ok(column) => {
                let codes = column.cast(&DataType::String)?;
                codes.str()?.iter().map(derive_year).collect()
            }
            Err(_) => vec![None; df.height()],
        };
        df.with_column(Series::new("year".into(), years))?;

        align_to_unified(df)
    }
}

/// Shared normalization pass applied after either era mapper; the single
/// invariant-enforcement point both eras funnel through.
pub struct CleaningTransformer;

impl Transformer for CleaningTransformer {
    fn transform(&self, df: DataFrame) -> Result<DataFrame> {
        info!("applying general cleaning");

        let codes = clean_string_column(&df, "project_code")?;
        let titles = clean_string_column(&df, "title")?;
        let directors = clean_string_column(&df, "director")?;
        let areas = clean_string_column(&df, "area")?;
        let keywords = clean_string_column(&df, "keywords")?;
        let amounts = clean_amount_column(&df)?;
        let years = clean_year_column(&df)?;
        let start_dates = passthrough_string_column(&df, "start_date")?;
        let end_dates = passthrough_string_column(&df, "end_date")?;

        let height = df.height();
        let mut kept_codes = Vec::with_capacity(height);
        let mut kept_years = Vec::with_capacity(height);
        let mut kept_titles = Vec::with_capacity(height);
        let mut kept_directors = Vec::with_capacity(height);
        let mut kept_keywords = Vec::with_capacity(height);
        let mut kept_amounts = Vec::with_capacity(height);
        let mut kept_areas = Vec::with_capacity(height);
        let mut kept_starts = Vec::with_capacity(height);
        let mut kept_ends = Vec::with_capacity(height);
        let mut seen = HashSet::new();

        for idx in 0..height {
            let Some(code) = codes[idx].as_deref() else {
                continue;
            };
            // Placeholder years (including the 0 produced by failed parses)
            // never reach the output, and the first occurrence of a code wins.
            if years[idx] <= 1990 || !seen.insert(code.to_string()) {
                continue;
            }

            kept_codes.push(codes[idx].clone());
            kept_years.push(years[idx]);
            kept_titles.push(titles[idx].clone());
            kept_directors.push(directors[idx].clone());
            kept_keywords.push(keywords[idx].clone());
            kept_amounts.push(amounts[idx]);
            kept_areas.push(areas[idx].clone());
            kept_starts.push(start_dates[idx].clone());
            kept_ends.push(end_dates[idx].clone());
        }

        Ok(DataFrame::new(vec![
            Series::new("project_code".into(), kept_codes).into(),
            Series::new("year".into(), kept_years).into(),
            Series::new("title".into(), kept_titles).into(),
            Series::new("director".into(), kept_directors).into(),
            Series::new("keywords".into(), kept_keywords).into(),
            Series::new("amount".into(), kept_amounts).into(),
            Series::new("area".into(), kept_areas).into(),
            Series::new("start_date".into(), kept_starts).into(),
            Series::new("end_date".into(), kept_ends).into(),
        ])?)
    }
}

fn rename_columns(df: &mut DataFrame, renames: &[(&str, &str)]) -> Result<()> {
    for &(from, to) in renames {
        if df.column(from).is_ok() {
            df.rename(from, to.into())?;
        }
    }
    Ok(())
}

/// Joins the non-blank keyword cells of a row with ", ", in column order.
fn join_keyword_columns(df: &DataFrame) -> Result<Vec<String>> {
    let mut columns = Vec::new();
    for name in ERA_A_KEYWORD_COLUMNS {
        if let Ok(column) = df.column(name) {
            columns.push(column.cast(&DataType::String)?);
        }
    }
    let values = columns
        .iter()
        .map(|column| column.str())
        .collect::<PolarsResult<Vec<_>>>()?;

    let mut joined = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let parts: Vec<&str> = values
            .iter()
            .filter_map(|column| column.get(idx))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        joined.push(parts.join(", "));
    }
    Ok(joined)
}

fn infer_areas(df: &DataFrame, keywords: &[String]) -> Result<Vec<&'static str>> {
    let titles = match df.column("title") {
        Ok(column) => Some(column.cast(&DataType::String)?),
        Err(_) => None,
    };
    let titles = match titles.as_ref() {
        Some(column) => Some(column.str()?),
        None => None,
    };

    let mut areas = Vec::with_capacity(keywords.len());
    for (idx, keyword_text) in keywords.iter().enumerate() {
        let mut text = keyword_text.to_lowercase();
        if let Some(values) = titles {
            if let Some(title) = values.get(idx) {
                text.push(' ');
                text.push_str(&title.to_lowercase());
            }
        }
        areas.push(infer_area(&text));
    }
    Ok(areas)
}

/// Contest codes embed a two-digit year after the two-letter program prefix,
/// e.g. "ID14-1234" was awarded in 2014. Codes without two digits at that
/// position yield no year.
fn derive_year(code: Option<&str>) -> Option<i64> {
    let digits: Vec<char> = code?.chars().skip(2).take(2).collect();
    if digits.len() == 2 && digits.iter().all(|ch| ch.is_ascii_digit()) {
        let value: String = digits.into_iter().collect();
        value.parse::<i64>().ok().map(|year| 2000 + year)
    } else {
        None
    }
}

fn clean_string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.str()?;
    Ok(values
        .iter()
        .map(|value| value.and_then(normalize_text))
        .collect())
}

/// Trim + title-case; text that trims away entirely or reads as a
/// stringified missing marker ("nan"/"nat") counts as missing.
fn normalize_text(raw: &str) -> Option<String> {
    let titled = title_case(raw.trim());
    match titled.as_str() {
        "" | "Nan" | "Nat" => None,
        _ => Some(titled),
    }
}

fn clean_amount_column(df: &DataFrame) -> Result<Vec<f64>> {
    let column = df.column("amount")?;
    // Already-numeric columns have no separator dots left to strip; only raw
    // text goes through the string path.
    if matches!(
        column.dtype(),
        DataType::Int32
            | DataType::Int64
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    ) {
        let values = column.cast(&DataType::Float64)?;
        return Ok(values
            .f64()?
            .iter()
            .map(|value| value.unwrap_or(0.0))
            .collect());
    }

    let column = column.cast(&DataType::String)?;
    let values = column.str()?;
    Ok(values
        .iter()
        .map(|value| {
            value
                .map(|raw| raw.replace('.', "").trim().parse::<f64>().unwrap_or(0.0))
                .unwrap_or(0.0)
        })
        .collect())
}

fn clean_year_column(df: &DataFrame) -> Result<Vec<i64>> {
    let column = df.column("year")?.cast(&DataType::Float64)?;
    let values = column.f64()?;
    Ok(values
        .iter()
        .map(|value| value.unwrap_or(0.0) as i64)
        .collect())
}

fn passthrough_string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column.str()?;
    Ok(values.iter().map(|value| value.map(str::to_string)).collect())
}

/// Python-style title casing: each alphabetic run starts uppercase and
/// continues lowercase.
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut inside_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if inside_word {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            inside_word = true;
        } else {
            result.push(ch);
            inside_word = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("sistema de riego"), "Sistema De Riego");
        assert_eq!(title_case("ID14-1234"), "Id14-1234");
        assert_eq!(title_case("  maría pérez  "), "  María Pérez  ");
    }

    #[test]
    fn derive_year_requires_two_digits_after_the_prefix() {
        assert_eq!(derive_year(Some("ID14-1234")), Some(2014));
        assert_eq!(derive_year(Some("XX07-0001")), Some(2007));
        assert_eq!(derive_year(Some("IDXX-0001")), None);
        assert_eq!(derive_year(Some("ID")), None);
        assert_eq!(derive_year(None), None);
    }
}
