use ndarray::Dimension;
use crate::nn::train_config::TrainConfig;
use crate::utils::ArrayF;

/// Plain gradient descent: `target -= grad * lr`
pub fn apply_constant<D: Dimension>(target: &mut ArrayF<D>, grad: &ArrayF<D>, config: &TrainConfig) {
    target.scaled_add(-config.lr, grad);
}
