use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};
use crate::env_config::EnvConfig;

/// Where the model of **name** is saved after **epoch** (1-based)
pub fn checkpoint_path(config: &EnvConfig, name: &str, epoch: usize) -> PathBuf {
    PathBuf::from(format!("{}/{}-{}.json", config.models_dir, name, epoch))
}

/// Where the model of **name** is saved once training finishes
pub fn final_path(config: &EnvConfig, name: &str) -> PathBuf {
    PathBuf::from(format!("{}/{}.json", config.models_dir, name))
}

pub fn ensure_models_dir(config: &EnvConfig) -> Result<()> {
    fs::create_dir_all(&config.models_dir)
        .with_context(|| format!("Couldn't create directory {}", config.models_dir))
}
