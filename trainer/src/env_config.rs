use std::env::var;
use std::str::FromStr;
use anyhow::{Context, Result};
use convnet::F;

/// Settings read from environment variables
#[derive(Clone, Debug, PartialEq)]
pub struct EnvConfig {
    /// MOMENTUM
    pub momentum: F,
    /// SEED, random when missing
    pub seed: Option<u64>,
    /// CHECKPOINT_EVERY, in epochs. 0 disables checkpoints.
    pub checkpoint_every: usize,
    /// MODELS_DIR
    pub models_dir: String,
}

fn get_path(value: String) -> String {
    match value.strip_suffix('/') {
        Some(value) => value.to_owned(),
        None => value,
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(value) => {
            let parsed = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid value '{}' for {}", value, name))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

impl EnvConfig {
    pub fn new() -> Result<Self> {
        Self::from_lookup(|name| var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            momentum: parse(&lookup, "MOMENTUM")?.unwrap_or(0.9),
            seed: parse(&lookup, "SEED")?,
            checkpoint_every: parse(&lookup, "CHECKPOINT_EVERY")?.unwrap_or(2),
            models_dir: lookup("MODELS_DIR").map(get_path).unwrap_or_else(|| "models".to_owned()),
        })
    }
}

#[cfg(test)]
pub(crate) fn test_config(models_dir: &str) -> EnvConfig {
    EnvConfig {
        momentum: 0.9,
        seed: Some(11),
        checkpoint_every: 1,
        models_dir: models_dir.to_owned(),
    }
}
