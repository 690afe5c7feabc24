//! Deterministic fixtures shared by the unit tests.

use std::fs;
use std::path::Path;

use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::assets::ASSET_FILES;
use crate::error::Result;
use crate::model::HeartModel;
use crate::records::{PatientRecord, FEATURE_COLUMNS, TARGET_COLUMN};

/// Rows spread over the input ranges, labelled by a simple risk score.
pub fn synthetic_rows(n: usize) -> Vec<(PatientRecord, i32)> {
    (0..n)
        .map(|i| {
            let k = i as u32;
            let record = PatientRecord {
                age: 29 + (k * 7) % 48,
                sex: (i % 2) as u8,
                chest_pain_type: 1 + ((i * 3) % 4) as u8,
                resting_bp: 94 + (k * 11) % 106,
                cholesterol: 126 + (k * 37) % 438,
                fasting_blood_sugar: u8::from(i % 5 == 0),
                resting_ecg: (i % 3) as u8,
                max_heart_rate: 71 + (k * 13) % 131,
                exercise_angina: u8::from((i * 7) % 3 == 0),
                oldpeak: ((i * 17) % 60) as f64 / 10.0,
                st_slope: 1 + ((i * 5) % 3) as u8,
            };
            let score = u32::from(record.age > 55)
                + u32::from(record.chest_pain_type == 4)
                + u32::from(record.exercise_angina)
                + u32::from(record.oldpeak > 2.0)
                + u32::from(record.max_heart_rate < 120)
                + u32::from(record.st_slope >= 2);
            (record, i32::from(score >= 3))
        })
        .collect()
}

pub fn write_dataset(path: &Path, n: usize) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header: Vec<&str> = FEATURE_COLUMNS.to_vec();
    header.push(TARGET_COLUMN);
    writer.write_record(&header)?;
    for (record, label) in synthetic_rows(n) {
        let mut row = feature_strings(&record);
        row.push(label.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_dataset_without_target(path: &Path, n: usize) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(FEATURE_COLUMNS)?;
    for (record, _) in synthetic_rows(n) {
        writer.write_record(&feature_strings(&record))?;
    }
    writer.flush()?;
    Ok(())
}

fn feature_strings(record: &PatientRecord) -> Vec<String> {
    record
        .features()
        .iter()
        .enumerate()
        .map(|(j, value)| {
            if FEATURE_COLUMNS[j] == "oldpeak" {
                format!("{:.1}", value)
            } else {
                format!("{}", *value as i64)
            }
        })
        .collect()
}

/// Forest fitted in memory on 200 synthetic rows.
pub fn fitted_model() -> HeartModel {
    let rows = synthetic_rows(200);
    let values: Vec<Vec<f64>> = rows.iter().map(|(r, _)| r.features().to_vec()).collect();
    let y: Vec<i32> = rows.iter().map(|(_, label)| *label).collect();
    let x = DenseMatrix::from_2d_vec(&values);
    HeartModel::fit(&x, &y, 25, 42).unwrap()
}

pub fn write_assets(dir: &Path) {
    for name in ASSET_FILES {
        fs::write(dir.join(name), format!("fake {}", name)).unwrap();
    }
}
