use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info};
use smartcore::linalg::basic::arrays::Array;
use smartcore::metrics::{accuracy, mean_squared_error};
use smartcore::model_selection::train_test_split;
use sysinfo::{ProcessExt, System, SystemExt};

use crate::dataset::{convert_features_to_matrix, feature_and_target, read_csv};
use crate::error::{HeartError, Result};
use crate::model::{HeartModel, DEFAULT_MODEL_PATH};
use crate::plot::{self, DEFAULT_PLOT_PATH};

pub const DEFAULT_DATASET: &str = "dataset.csv";

#[derive(Debug, Clone)]
pub struct TrainingOptions {
    pub dataset: PathBuf,
    pub model_path: PathBuf,
    /// `None` skips the diagnostic plot.
    pub plot_path: Option<PathBuf>,
    pub test_size: f32,
    pub seed: u64,
    pub n_trees: u16,
    pub plot_samples: usize,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        TrainingOptions {
            dataset: PathBuf::from(DEFAULT_DATASET),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            plot_path: Some(PathBuf::from(DEFAULT_PLOT_PATH)),
            test_size: 0.2,
            seed: 42,
            n_trees: 100,
            plot_samples: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub mse: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    /// First `plot_samples` held-out labels and their predictions.
    pub actual: Vec<i32>,
    pub predicted: Vec<i32>,
}

fn monitor_memory() -> u64 {
    /* Resident memory of this process in bytes, 0 when it cannot be read */
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(_) => return 0,
    };
    let mut sys = System::new();
    sys.refresh_process(pid);
    sys.process(pid).map(|p| p.memory()).unwrap_or(0)
}

/// Rows the split holds out for testing, rounded down.
fn held_out_rows(rows: usize, test_size: f32) -> usize {
    (rows as f32 * test_size) as usize
}

fn split_is_usable(rows: usize, test_size: f32) -> bool {
    let held_out = held_out_rows(rows, test_size);
    held_out >= 1 && held_out < rows
}

/* train_test_split panics when nothing would be held out, so the row count is checked first */
fn ensure_splittable(rows: usize, test_size: f32) -> Result<()> {
    if split_is_usable(rows, test_size) {
        return Ok(());
    }
    let minimum = (rows + 1..)
        .take(10_000)
        .find(|&n| split_is_usable(n, test_size))
        .unwrap_or(rows + 1);
    Err(HeartError::TooFewRows { rows, minimum })
}

pub async fn run(opts: &TrainingOptions) -> Result<TrainingReport> {
    let start_time = Instant::now();
    let start_memory = monitor_memory();

    let df = read_csv(&opts.dataset).await?;
    let (features, y) = feature_and_target(&df)?;
    ensure_splittable(y.len(), opts.test_size)?;
    let x = convert_features_to_matrix(&features)?;

    let (x_train, x_test, y_train, y_test) =
        train_test_split(&x, &y, opts.test_size, true, Some(opts.seed));
    info!(
        "split {} rows into {} train / {} test",
        y.len(),
        y_train.len(),
        y_test.len()
    );

    let model = HeartModel::fit(&x_train, &y_train, opts.n_trees, opts.seed)?;
    info!("fitted random forest with {} trees", opts.n_trees);

    let y_pred = model.predict_matrix(&x_test)?;
    let report = evaluate(&y_test, &y_pred, y_train.len(), opts.plot_samples);
    debug!("held-out shape {:?}", x_test.shape());

    model.save(&opts.model_path)?;

    if let Some(plot_path) = &opts.plot_path {
        plot::actual_vs_predicted(plot_path, &report.actual, &report.predicted)?;
    }

    let end_memory = monitor_memory();
    info!("training took {:?}", start_time.elapsed());
    info!(
        "memory used: {} KiB",
        end_memory.saturating_sub(start_memory) / 1024
    );

    Ok(report)
}

fn evaluate(
    y_test: &Vec<i32>,
    y_pred: &Vec<i32>,
    train_rows: usize,
    samples: usize,
) -> TrainingReport {
    let actual_f: Vec<f64> = y_test.iter().map(|v| f64::from(*v)).collect();
    let pred_f: Vec<f64> = y_pred.iter().map(|v| f64::from(*v)).collect();
    let shown = samples.min(y_test.len());

    TrainingReport {
        accuracy: accuracy(y_test, y_pred),
        mse: mean_squared_error(&actual_f, &pred_f),
        train_rows,
        test_rows: y_test.len(),
        actual: y_test[..shown].to_vec(),
        predicted: y_pred[..shown].to_vec(),
    }
}
