use polars::prelude::*;

use crate::error::Result;

/// Unified grant schema shared by both contest eras, in output column order.
pub const UNIFIED_COLUMNS: [&str; 9] = [
    "project_code",
    "year",
    "title",
    "director",
    "keywords",
    "amount",
    "area",
    "start_date",
    "end_date",
];

/// Ordered research-domain lexicon. Domains are scanned top to bottom and the
/// first one with a trigger substring present in the text wins, so the
/// declaration order is load-bearing.
pub const AREA_LEXICON: &[(&str, &[&str])] = &[
    (
        "Agropecuaria",
        &[
            "agro",
            "fruta",
            "cultivo",
            "suelo",
            "riego",
            "plaga",
            "vino",
            "vid",
            "ganado",
            "leche",
            "bovino",
            "ovino",
            "agricola",
            "veterinaria",
            "hortaliza",
            "cereal",
        ],
    ),
    (
        "Pesca y Acuicultura",
        &[
            "pesca",
            "acuicultura",
            "salmon",
            "trucha",
            "alga",
            "marino",
            "pez",
            "peces",
            "bentonico",
            "molusco",
            "chorito",
            "ostion",
        ],
    ),
    (
        "Salud",
        &[
            "salud",
            "medicina",
            "clinica",
            "paciente",
            "enfermedad",
            "virus",
            "bacteria",
            "cancer",
            "terapia",
            "farmaco",
            "vacuna",
            "biomed",
            "hospital",
        ],
    ),
    (
        "Minería",
        &[
            "mineria",
            "cobre",
            "mineral",
            "lixiviacion",
            "flotacion",
            "relave",
            "geologia",
            "metalurgia",
            "minero",
        ],
    ),
    (
        "Forestal",
        &[
            "forestal",
            "bosque",
            "madera",
            "pino",
            "eucalipto",
            "celulosa",
            "papel",
            "arbol",
            "silvicultura",
        ],
    ),
    (
        "TIC",
        &[
            "software",
            "informatica",
            "computacion",
            "internet",
            "web",
            "datos",
            "inteligencia",
            "digital",
            "sistema experto",
            "redes",
            "tic",
            "tecnologia de informacion",
        ],
    ),
    (
        "Educación",
        &[
            "educacion",
            "escolar",
            "aprendizaje",
            "pedagogia",
            "didactica",
            "aula",
            "docente",
            "colegio",
            "enseñanza",
        ],
    ),
    (
        "Energía",
        &[
            "energia",
            "solar",
            "eolico",
            "biocombustible",
            "electrico",
            "generacion",
            "eficiencia energetica",
            "fotovoltaico",
        ],
    ),
    (
        "Infraestructura",
        &[
            "construccion",
            "hormigon",
            "cemento",
            "vivienda",
            "pavimento",
            "estructuras",
            "sismico",
            "vial",
            "edificio",
        ],
    ),
    (
        "Manufactura",
        &[
            "manufactura",
            "proceso",
            "industrial",
            "materiales",
            "polimero",
            "plastico",
            "envase",
        ],
    ),
    (
        "Alimentos",
        &[
            "alimento",
            "nutricion",
            "dieta",
            "funcional",
            "antioxidante",
            "proteina",
            "gastronomia",
        ],
    ),
];

pub const AREA_FALLBACK: &str = "Otros";

/// Picks the research domain for the given lower-cased keyword/title text.
pub fn infer_area(text: &str) -> &'static str {
    for &(area, triggers) in AREA_LEXICON {
        if triggers.iter().any(|trigger| text.contains(trigger)) {
            return area;
        }
    }
    AREA_FALLBACK
}

pub(crate) fn unified_dtype(column: &str) -> DataType {
    match column {
        "year" => DataType::Int64,
        "amount" => DataType::Float64,
        _ => DataType::String,
    }
}

/// Guarantees every unified column exists (absent ones become all-null) and
/// restricts the frame to the unified columns in schema order.
pub fn align_to_unified(mut df: DataFrame) -> Result<DataFrame> {
    let height = df.height();
    for column in UNIFIED_COLUMNS {
        if df.column(column).is_err() {
            df.with_column(Series::full_null(
                column.into(),
                height,
                &unified_dtype(column),
            ))?;
        }
    }
    Ok(df.select(UNIFIED_COLUMNS)?)
}
