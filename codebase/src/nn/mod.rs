pub mod tensor;
pub mod layers;
pub mod loss;
pub mod model;
pub mod lr_calculators;
pub mod train_config;
