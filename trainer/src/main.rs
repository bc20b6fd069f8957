//! Command-line interface to create, train, evaluate and run convnet models.

mod env_config;
mod evaluating;
mod files;
mod training;

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use convnet::integration::dataset_loading::Dataset;
use convnet::integration::layers_loading::load_model_xml;
use convnet::{Model, F};
use env_logger::{Builder, Env};
use log::{info, LevelFilter};
use crate::env_config::EnvConfig;
use crate::training::TrainArgs;

#[derive(Parser, Debug)]
#[command(name = "trainer", version, about = "Create, train, evaluate and run convnet models.")]
struct Cli {
    /// Log more details (-v for debug, -vv for trace). RUST_LOG is respected otherwise.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Accuracy and loss of a model over every image of a dataset
    Evaluate {
        model: PathBuf,
        /// Directory with one sub-directory of images per class
        dataset: PathBuf,
    },
    /// Predict the class of a single image
    Classify {
        model: PathBuf,
        image: PathBuf,
        /// Dataset whose class names are printed instead of indices
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Train a model with stochastic gradient descent, saving checkpoints along the way
    Train {
        model: PathBuf,
        dataset: PathBuf,
        lr: F,
        epochs: usize,
        /// Images of each class used for training
        train_size: usize,
        /// Images of each class, after the training ones, used for validation
        valid_size: usize,
        /// Base name of the saved models
        name: String,
    },
    /// Create a randomly initialized model from an XML architecture file
    Init {
        architecture: PathBuf,
        output: PathBuf,
    },
}

fn setup_env_logger(verbose: u8) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_env_logger(cli.verbose);
    let config = EnvConfig::new()?;

    match cli.command {
        Command::Evaluate { model, dataset } => {
            let mut model = load_model(&model)?;
            let dataset = open_dataset(&dataset)?;
            let report = evaluating::evaluate(&mut model, &dataset, &dataset.all())?;
            println!("{}", report.display(dataset.classes()));
        }
        Command::Classify { model, image, dataset } => {
            let mut model = load_model(&model)?;
            let classes = match dataset {
                Some(path) => open_dataset(&path)?.classes().to_vec(),
                None => Vec::new(),
            };
            let prediction = evaluating::classify(&mut model, &image)?;
            println!("{}", prediction.display(&classes));
        }
        Command::Train { model, dataset, lr, epochs, train_size, valid_size, name } => {
            let args = TrainArgs { model, dataset, lr, epochs, train_size, valid_size, name };
            training::train(&args, &config)?;
        }
        Command::Init { architecture, output } => {
            let bytes = fs::read(&architecture)
                .with_context(|| format!("Couldn't read architecture {}", architecture.display()))?;
            let model = load_model_xml(&bytes, config.seed)
                .with_context(|| format!("Couldn't build a model from {}", architecture.display()))?;
            model
                .save(&output)
                .with_context(|| format!("Couldn't save model to {}", output.display()))?;
            info!("Created model with {} layers and output {:?}", model.len(), model.output_shape());
        }
    }
    Ok(())
}

pub(crate) fn load_model(path: &Path) -> Result<Model> {
    Model::load(path).with_context(|| format!("Couldn't load model {}", path.display()))
}

pub(crate) fn open_dataset(path: &Path) -> Result<Dataset> {
    Dataset::open(path).with_context(|| format!("Couldn't open dataset {}", path.display()))
}
