use std::path::Path;

use log::{info, warn};

use crate::error::Result;
use crate::model::HeartModel;
use crate::records::{PatientRecord, RiskLabel};

pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<PatientRecord>> {
    /* Rows are matched to fields by header name; extra columns such as target are ignored */
    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let record: PatientRecord = row?;
        records.push(record);
    }
    Ok(records)
}

pub fn predict_file<P: AsRef<Path>>(model: &HeartModel, path: P) -> Result<Vec<RiskLabel>> {
    let records = read_records(path)?;

    let mut labels = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if let Err(e) = record.validate() {
            warn!("row {}: {}", i, e);
        }
        labels.push(model.predict(record)?);
    }

    let high = labels.iter().filter(|l| **l == RiskLabel::High).count();
    info!(
        "{} records: {} high risk, {} low risk",
        labels.len(),
        high,
        labels.len() - high
    );
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeartError;
    use crate::testutil;

    #[test]
    fn reads_dataset_rows_ignoring_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        testutil::write_dataset(&path, 12).unwrap();

        let records = read_records(&path).unwrap();
        let expected: Vec<PatientRecord> = testutil::synthetic_rows(12)
            .into_iter()
            .map(|(record, _)| record)
            .collect();
        assert_eq!(records, expected);
    }

    #[test]
    fn predicts_one_label_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        testutil::write_dataset_without_target(&path, 20).unwrap();

        let model = testutil::fitted_model();
        let labels = predict_file(&model, &path).unwrap();
        assert_eq!(labels.len(), 20);
        for (label, (record, _)) in labels.iter().zip(testutil::synthetic_rows(20)) {
            assert_eq!(*label, model.predict(&record).unwrap());
        }
    }

    #[test]
    fn malformed_row_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, "age,sex\nfifty,1\n").unwrap();

        assert!(matches!(read_records(&path), Err(HeartError::Csv(_))));
    }
}
