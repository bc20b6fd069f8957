use crate::utils::F;

/// Hyperparameters of a single optimizer step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainConfig {
    pub lr: F,
    pub momentum: F,
}

impl TrainConfig {
    pub fn new(lr: F) -> Self {
        Self { lr, ..Self::default() }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            lr: 0.001,
            momentum: 0.9,
        }
    }
}
