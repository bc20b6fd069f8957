use std::path::PathBuf;
use anyhow::{Context, Result};
use convnet::integration::dataset_loading::shuffle;
use convnet::nn::model::Metrics;
use convnet::nn::train_config::TrainConfig;
use convnet::F;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::env_config::EnvConfig;
use crate::evaluating::evaluate;
use crate::files::{checkpoint_path, ensure_models_dir, final_path};
use crate::{load_model, open_dataset};

#[derive(Clone, Debug)]
pub struct TrainArgs {
    pub model: PathBuf,
    pub dataset: PathBuf,
    pub lr: F,
    pub epochs: usize,
    pub train_size: usize,
    pub valid_size: usize,
    pub name: String,
}

/// Metrics of one pass over the training samples, followed by one over the validation samples
#[derive(Clone, Copy, Debug)]
pub struct EpochReport {
    pub epoch: usize,
    pub train: Metrics,
    pub valid: Metrics,
}

/// Train the model one sample at a time, shuffling the samples every epoch. The model is saved
/// every **checkpoint_every** epochs and once training finishes.
pub fn train(args: &TrainArgs, config: &EnvConfig) -> Result<Vec<EpochReport>> {
    let mut model = load_model(&args.model)?;
    let dataset = open_dataset(&args.dataset)?;
    let (mut train_samples, valid_samples) = dataset.split(args.train_size, args.valid_size);
    let train_config = TrainConfig { lr: args.lr, momentum: config.momentum };
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    ensure_models_dir(config)?;

    info!(
        "Training '{}' with {} samples ({} for validation) of {} classes, lr={} momentum={}",
        args.name,
        train_samples.len(),
        valid_samples.len(),
        dataset.class_count(),
        train_config.lr,
        train_config.momentum
    );

    let mut reports = Vec::with_capacity(args.epochs);
    for epoch in 1..=args.epochs {
        shuffle(&mut train_samples, &mut rng);

        let mut train = Metrics::default();
        for (i, sample) in train_samples.iter().enumerate() {
            let (inputs, target) = dataset
                .load(sample)
                .with_context(|| format!("Couldn't load {}", sample.path.display()))?;
            let result = model.fit(inputs, &target, &train_config)?;
            train.record(&result);

            if (i + 1) % 100 == 0 {
                debug!(
                    "    {} -> loss={:.4} accuracy={:.2}%",
                    i + 1,
                    train.average_loss(),
                    train.accuracy() * 100.0
                );
            }
        }

        let valid = evaluate(&mut model, &dataset, &valid_samples)?.overall;
        info!(
            "Epoch {}/{}: train loss={:.4} accuracy={:.2}%, validation loss={:.4} accuracy={:.2}%",
            epoch,
            args.epochs,
            train.average_loss(),
            train.accuracy() * 100.0,
            valid.average_loss(),
            valid.accuracy() * 100.0
        );
        reports.push(EpochReport { epoch, train, valid });

        if config.checkpoint_every != 0 && epoch % config.checkpoint_every == 0 {
            let path = checkpoint_path(config, &args.name, epoch);
            model
                .save(&path)
                .with_context(|| format!("Couldn't save checkpoint {}", path.display()))?;
        }
    }

    let path = final_path(config, &args.name);
    model
        .save(&path)
        .with_context(|| format!("Couldn't save model {}", path.display()))?;
    info!("Finished training, model saved to {}", path.display());
    Ok(reports)
}
