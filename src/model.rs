use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{HeartError, Result};
use crate::records::{PatientRecord, RiskLabel, FEATURE_COLUMNS};

pub const DEFAULT_MODEL_PATH: &str = "heart_disease_model.json";

type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// A fitted forest together with the feature names it was trained on.
///
/// The names travel inside the artifact so that loading can reject a model
/// built for a different column layout.
#[derive(Debug, Serialize, Deserialize)]
pub struct HeartModel {
    features: Vec<String>,
    n_trees: u16,
    seed: u64,
    forest: Forest,
}

impl HeartModel {
    pub fn fit(x: &DenseMatrix<f64>, y: &Vec<i32>, n_trees: u16, seed: u64) -> Result<Self> {
        let parameters = RandomForestClassifierParameters::default()
            .with_n_trees(n_trees)
            .with_seed(seed);
        let forest = RandomForestClassifier::fit(x, y, parameters)?;

        Ok(HeartModel {
            features: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            n_trees,
            seed,
            forest,
        })
    }

    pub fn n_trees(&self) -> u16 {
        self.n_trees
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn predict_matrix(&self, x: &DenseMatrix<f64>) -> Result<Vec<i32>> {
        Ok(self.forest.predict(x)?)
    }

    pub fn predict(&self, record: &PatientRecord) -> Result<RiskLabel> {
        let features = record.features();
        let x = DenseMatrix::new(1, features.len(), features.to_vec(), false);
        let labels = self.predict_matrix(&x)?;
        match labels.first() {
            Some(label) => RiskLabel::try_from(*label),
            None => Err(HeartError::EmptyPrediction),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!("model saved to {:?}", path);
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let model: HeartModel = serde_json::from_reader(reader)?;

        if model.features != FEATURE_COLUMNS {
            return Err(HeartError::SchemaMismatch {
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: model.features,
            });
        }
        info!(
            "model loaded from {:?} ({} trees, seed {})",
            path, model.n_trees, model.seed
        );
        Ok(model)
    }
}
