use std::path::PathBuf;

use polars::prelude::PolarsError;
use smartcore::error::Failed;
use thiserror::Error;

pub type Result<T, E = HeartError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum HeartError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),
    #[error("model error: {0}")]
    Model(#[from] Failed),
    #[error("artifact encoding error: {0}")]
    Artifact(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("plot error: {0}")]
    Plot(String),
    #[error("dataset has no `target` column")]
    MissingTarget,
    #[error("feature columns {found:?} do not match the expected schema {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("column {column:?} contains {count} null values")]
    NullValues { column: String, count: usize },
    #[error("dataset has {rows} rows, at least {minimum} are needed to split and train")]
    TooFewRows { rows: usize, minimum: usize },
    #[error("classifier returned no prediction")]
    EmptyPrediction,
    #[error("classifier produced label {0}, expected 0 or 1")]
    InvalidLabel(i32),
    #[error("invalid {field}: {reason}")]
    InvalidRecord { field: &'static str, reason: String },
    #[error("missing asset {path:?}")]
    MissingAsset { path: PathBuf },
}
