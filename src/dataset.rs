use std::fs::File;
use std::path::Path;

use log::{debug, info};
use polars::prelude::*;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{HeartError, Result};
use crate::records::{FEATURE_COLUMNS, FEATURE_SCHEMA, TARGET_COLUMN};

pub async fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    /* Load the raw dataset, header row first. Dtypes are inferred and cast later so that a
    missing column is reported by name instead of by the reader */
    let path = path.as_ref();
    let file = File::open(path)?;

    let df = CsvReader::new(file).has_header(true).finish()?;
    info!("loaded {} rows x {} columns from {:?}", df.height(), df.width(), path);

    Ok(df)
}

pub fn feature_and_target(in_df: &DataFrame) -> Result<(DataFrame, Vec<i32>)> {
    /* Split the dataframe into the feature frame (everything but target) and the label vector */
    if !in_df.get_column_names().contains(&TARGET_COLUMN) {
        return Err(HeartError::MissingTarget);
    }

    let features = in_df.drop(TARGET_COLUMN)?;
    let found: Vec<&str> = features.get_column_names();
    if found != FEATURE_COLUMNS {
        return Err(HeartError::SchemaMismatch {
            expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found: found.iter().map(|c| c.to_string()).collect(),
        });
    }

    let target = in_df.column(TARGET_COLUMN)?;
    ensure_no_nulls(target)?;
    let target = target.cast(&DataType::Int32)?;
    let y: Vec<i32> = target.i32()?.into_no_null_iter().collect();

    Ok((features, y))
}

pub fn convert_features_to_matrix(in_df: &DataFrame) -> Result<DenseMatrix<f64>> {
    /* Convert the feature frame to a column-major DenseMatrix readable by smartcore */
    let casts: Vec<Expr> = FEATURE_SCHEMA
        .iter()
        .map(|(name, dtype)| col(name.as_str()).cast(dtype.clone()))
        .collect();
    let casted = in_df.clone().lazy().select(casts).collect()?;

    let nrows = casted.height();
    let ncols = casted.width();
    let mut xs: Vec<f64> = Vec::with_capacity(nrows * ncols);

    for series in casted.get_columns() {
        ensure_no_nulls(series)?;
        xs.extend(series.f64()?.into_no_null_iter());
    }
    debug!("feature matrix is {}x{}", nrows, ncols);

    Ok(DenseMatrix::new(nrows, ncols, xs, true))
}

fn ensure_no_nulls(series: &Series) -> Result<()> {
    let count = series.null_count();
    if count > 0 {
        return Err(HeartError::NullValues {
            column: series.name().to_string(),
            count,
        });
    }
    Ok(())
}
