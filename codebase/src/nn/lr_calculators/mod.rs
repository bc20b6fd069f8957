pub mod constant_lr;
pub mod momentum_lr;
