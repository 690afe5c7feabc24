extern crate serde;

mod assets;
mod batch;
mod dataset;
mod error;
mod model;
mod page;
mod plot;
mod records;
#[cfg(test)]
mod testutil;
mod training;
mod web;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use env_logger::{Builder, Env};
use log::{debug, info, LevelFilter};

use assets::Assets;
use error::Result;
use model::{HeartModel, DEFAULT_MODEL_PATH};
use plot::DEFAULT_PLOT_PATH;
use training::{TrainingOptions, DEFAULT_DATASET};
use web::{AppState, DEFAULT_BIND};

#[derive(Parser, Debug)]
#[command(author, version, about = "Heart disease risk: training and web front-end", long_about = None)]
#[command(propagate_version = true)]
struct HeartArgs {
    #[arg(short, long, action = ArgAction::Count, global = true, help = "Verbose level")]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit the random forest on a CSV dataset and save the model
    Train {
        #[arg(short, long, default_value = DEFAULT_DATASET, help = "Input dataset")]
        dataset: PathBuf,
        #[arg(short, long, env = "HEARTWISE_MODEL", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        #[arg(short, long, default_value = DEFAULT_PLOT_PATH, help = "Actual vs predicted plot")]
        plot: PathBuf,
        #[arg(long, help = "Skip the diagnostic plot")]
        no_plot: bool,
    },
    /// Serve the risk form over HTTP
    Serve {
        #[arg(short, long, env = "HEARTWISE_MODEL", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        #[arg(short, long, env = "HEARTWISE_ASSETS", default_value = "assets")]
        assets: PathBuf,
        #[arg(short, long, env = "HEARTWISE_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,
    },
    /// Predict every patient row of a CSV file
    Predict {
        #[arg(short, long, env = "HEARTWISE_MODEL", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        #[arg(short, long, help = "Patient records CSV")]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = HeartArgs::parse();

    let log_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let env = Env::new().filter("HEARTWISE_LOG");
    Builder::new()
        .filter(Some("heartwise"), log_level)
        .parse_env(env)
        .init();

    debug!("Arguments {:#?}", cli);

    match cli.command {
        Command::Train {
            dataset,
            model,
            plot,
            no_plot,
        } => {
            let opts = TrainingOptions {
                dataset,
                model_path: model,
                plot_path: if no_plot { None } else { Some(plot) },
                ..TrainingOptions::default()
            };
            let report = training::run(&opts).await?;
            info!(
                "trained on {} rows, evaluated on {}",
                report.train_rows, report.test_rows
            );
            println!("\nAccuracy: {:.2}%", report.accuracy * 100.0);
            println!("Mean Squared Error (MSE): {:.4}", report.mse);
        }
        Command::Serve {
            model,
            assets,
            bind,
        } => {
            let model = HeartModel::load(&model)?;
            let assets = Assets::load(&assets)?;
            web::serve(AppState::new(model, assets)?, bind).await?;
        }
        Command::Predict { model, input } => {
            let model = HeartModel::load(&model)?;
            let labels = batch::predict_file(&model, &input)?;
            for (row, label) in labels.iter().enumerate() {
                println!("{},{}", row, label.as_i32());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_fixed_paths() {
        let args = HeartArgs::try_parse_from(["heartwise", "train"]).unwrap();
        match args.command {
            Command::Train {
                dataset,
                plot,
                no_plot,
                ..
            } => {
                assert_eq!(dataset, PathBuf::from("dataset.csv"));
                assert_eq!(plot, PathBuf::from("actual_vs_predicted.png"));
                assert!(!no_plot);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn serve_parses_bind_address() {
        let args = HeartArgs::try_parse_from([
            "heartwise",
            "-vv",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--assets",
            "static",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Serve { assets, bind, .. } => {
                assert_eq!(assets, PathBuf::from("static"));
                assert_eq!(bind.port(), 9000);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn predict_requires_an_input() {
        assert!(HeartArgs::try_parse_from(["heartwise", "predict"]).is_err());
    }
}
