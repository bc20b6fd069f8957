use ndarray::{Dimension, Zip};
use crate::nn::train_config::TrainConfig;
use crate::utils::ArrayF;

/// Nesterov momentum step, applied elementwise:
/// ```text
/// v_prev = v
/// v = v * momentum - grad * lr
/// w = w - v_prev * momentum + v * (1 + momentum)
/// ```
/// **velocity** must start zeroed and be kept between calls.
pub fn apply_momentum<D: Dimension>(
    target: &mut ArrayF<D>,
    velocity: &mut ArrayF<D>,
    grad: &ArrayF<D>,
    config: &TrainConfig,
) {
    let TrainConfig { lr, momentum } = *config;
    Zip::from(target)
        .and(velocity)
        .and(grad)
        .for_each(|w, v, &g| {
            let v_prev = *v;
            *v = v_prev * momentum - g * lr;
            *w += -v_prev * momentum + *v * (1.0 + momentum);
        });
}
