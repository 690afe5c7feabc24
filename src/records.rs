use lazy_static::lazy_static;
use polars::prelude::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};

use crate::error::{HeartError, Result};

pub const TARGET_COLUMN: &str = "target";

/// Column names of the feature matrix, in the order the classifier sees them.
pub const FEATURE_COLUMNS: [&str; 11] = [
    "age",
    "sex",
    "chest pain type",
    "resting bp s",
    "cholesterol",
    "fasting blood sugar",
    "resting ecg",
    "max heart rate",
    "exercise angina",
    "oldpeak",
    "ST slope",
];

lazy_static! {
    /// Every feature column is fed to the forest as Float64.
    pub static ref FEATURE_SCHEMA: Schema = Schema::from_iter(
        FEATURE_COLUMNS
            .iter()
            .map(|name| Field::new(name, DataType::Float64)),
    );
}

pub enum FieldKind {
    Integer { min: u32, max: u32 },
    Decimal { min: f64, max: f64, step: f64 },
    /// Binary flag rendered as radio buttons: (value, label).
    Radio(&'static [(u8, &'static str)]),
    Select(&'static [u8]),
}

pub struct FieldSpec {
    pub column: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const NO_YES: &[(u8, &str)] = &[(0, "No"), (1, "Yes")];

/// Input constraints, one entry per feature column and in the same order.
pub static FIELD_SPECS: [FieldSpec; 11] = [
    FieldSpec {
        column: "age",
        label: "Age",
        kind: FieldKind::Integer { min: 1, max: 120 },
    },
    FieldSpec {
        column: "sex",
        label: "Sex",
        kind: FieldKind::Radio(&[(0, "Female"), (1, "Male")]),
    },
    FieldSpec {
        column: "chest pain type",
        label: "Chest Pain Type (1-4)",
        kind: FieldKind::Select(&[1, 2, 3, 4]),
    },
    FieldSpec {
        column: "resting bp s",
        label: "Resting BP (mmHg)",
        kind: FieldKind::Integer { min: 80, max: 200 },
    },
    FieldSpec {
        column: "cholesterol",
        label: "Cholesterol (mg/dL)",
        kind: FieldKind::Integer { min: 100, max: 600 },
    },
    FieldSpec {
        column: "fasting blood sugar",
        label: "Fasting Blood Sugar > 120 mg/dL?",
        kind: FieldKind::Radio(NO_YES),
    },
    FieldSpec {
        column: "resting ecg",
        label: "Resting ECG (0-2)",
        kind: FieldKind::Select(&[0, 1, 2]),
    },
    FieldSpec {
        column: "max heart rate",
        label: "Max Heart Rate",
        kind: FieldKind::Integer { min: 60, max: 220 },
    },
    FieldSpec {
        column: "exercise angina",
        label: "Exercise Induced Angina",
        kind: FieldKind::Radio(NO_YES),
    },
    FieldSpec {
        column: "oldpeak",
        label: "Oldpeak ST Depression",
        kind: FieldKind::Decimal {
            min: 0.0,
            max: 6.0,
            step: 0.1,
        },
    },
    FieldSpec {
        column: "ST slope",
        label: "ST Slope (1-3)",
        kind: FieldKind::Select(&[1, 2, 3]),
    },
];

impl FieldSpec {
    pub fn check(&self, value: f64) -> Result<()> {
        let ok = match &self.kind {
            FieldKind::Integer { min, max } => {
                value.fract() == 0.0 && value >= f64::from(*min) && value <= f64::from(*max)
            }
            FieldKind::Decimal { min, max, .. } => value >= *min && value <= *max,
            FieldKind::Radio(options) => options.iter().any(|(v, _)| f64::from(*v) == value),
            FieldKind::Select(options) => options.iter().any(|v| f64::from(*v) == value),
        };
        if ok {
            Ok(())
        } else {
            Err(HeartError::InvalidRecord {
                field: self.label,
                reason: format!("{} is outside {}", value, self.describe_range()),
            })
        }
    }

    pub fn describe_range(&self) -> String {
        match &self.kind {
            FieldKind::Integer { min, max } => format!("{}-{}", min, max),
            FieldKind::Decimal { min, max, .. } => format!("{:.1}-{:.1}", min, max),
            FieldKind::Radio(options) => {
                let values: Vec<String> = options.iter().map(|(v, _)| v.to_string()).collect();
                format!("{{{}}}", values.join(", "))
            }
            FieldKind::Select(options) => {
                let values: Vec<String> = options.iter().map(|v| v.to_string()).collect();
                format!("{{{}}}", values.join(", "))
            }
        }
    }
}

/// One patient's measurements. Serde names match the dataset header so the
/// same struct reads CSV rows and form submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u32,
    pub sex: u8,
    #[serde(rename = "chest pain type")]
    pub chest_pain_type: u8,
    #[serde(rename = "resting bp s")]
    pub resting_bp: u32,
    pub cholesterol: u32,
    #[serde(rename = "fasting blood sugar")]
    pub fasting_blood_sugar: u8,
    #[serde(rename = "resting ecg")]
    pub resting_ecg: u8,
    #[serde(rename = "max heart rate")]
    pub max_heart_rate: u32,
    #[serde(rename = "exercise angina")]
    pub exercise_angina: u8,
    pub oldpeak: f64,
    #[serde(rename = "ST slope")]
    pub st_slope: u8,
}

impl Default for PatientRecord {
    fn default() -> Self {
        PatientRecord {
            age: 50,
            sex: 0,
            chest_pain_type: 1,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: 0,
            resting_ecg: 0,
            max_heart_rate: 150,
            exercise_angina: 0,
            oldpeak: 1.0,
            st_slope: 1,
        }
    }
}

impl PatientRecord {
    /// Feature vector in `FEATURE_COLUMNS` order.
    pub fn features(&self) -> [f64; 11] {
        [
            f64::from(self.age),
            f64::from(self.sex),
            f64::from(self.chest_pain_type),
            f64::from(self.resting_bp),
            f64::from(self.cholesterol),
            f64::from(self.fasting_blood_sugar),
            f64::from(self.resting_ecg),
            f64::from(self.max_heart_rate),
            f64::from(self.exercise_angina),
            self.oldpeak,
            f64::from(self.st_slope),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        FIELD_SPECS
            .iter()
            .zip(self.features())
            .try_for_each(|(spec, value)| spec.check(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    Low,
    High,
}

impl RiskLabel {
    pub fn as_i32(self) -> i32 {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::High => 1,
        }
    }
}

impl TryFrom<i32> for RiskLabel {
    type Error = HeartError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(RiskLabel::Low),
            1 => Ok(RiskLabel::High),
            other => Err(HeartError::InvalidLabel(other)),
        }
    }
}
