use crate::error::ConvNetError;
use crate::nn::tensor::Tensor;
use crate::utils::{GenericResult, F};

/// Exponentials normalized by their sum. The highest value is subtracted first so large
/// inputs don't overflow, which leaves the result unchanged.
pub fn softmax(values: &Tensor) -> Tensor {
    let max = values
        .iter()
        .copied()
        .fold(F::NEG_INFINITY, F::max);
    let max = if max.is_finite() { max } else { 0.0 };
    let e = values.map(|o| (o - max).exp());
    let sum = e.sum();
    e / sum
}

/// Position of the only 1 in **target**. Every other element must be 0.
pub fn one_hot_index(target: &Tensor) -> GenericResult<usize> {
    let mut hot = None;
    for (i, &value) in target.iter().enumerate() {
        if value == 1.0 && hot.is_none() {
            hot = Some(i);
        } else if value != 0.0 {
            return Err(ConvNetError::InvalidTarget(format!("unexpected value {} at position {}", value, i)));
        }
    }
    hot.ok_or_else(|| ConvNetError::InvalidTarget("no position is set to 1".to_owned()))
}

/// `-ln(p[i])` where **i** is the hot position of **target**
pub fn calc_loss(probabilities: &Tensor, target: &Tensor) -> GenericResult<F> {
    if target.shape() != probabilities.shape() {
        return Err(ConvNetError::InvalidTarget(format!(
            "expected shape {}, found {}",
            probabilities.shape(),
            target.shape()
        )));
    }
    let label = one_hot_index(target)?;
    let p = probabilities.iter().nth(label).copied().unwrap_or(0.0);
    Ok(-p.ln())
}

/// Gradient of the loss with respect to the softmax inputs: `p - target`
pub fn calc_loss_grad(probabilities: &Tensor, target: &Tensor) -> GenericResult<Tensor> {
    probabilities.try_sub(target)
}

#[cfg(test)]
mod tests {
    use crate::utils::arrays_almost_equal;
    use super::*;

    #[test]
    fn test_softmax() {
        let inputs = Tensor::column(vec![0.6, 0.7, 0.4]);
        let expected = Tensor::column(vec![0.34200877, 0.37797814, 0.28001309]);
        let result = softmax(&inputs);
        assert!(arrays_almost_equal(result.as_array(), expected.as_array()));
        assert!((result.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_softmax_large_values() {
        let result = softmax(&Tensor::column(vec![1000.0, 1000.0]));
        assert!(arrays_almost_equal(result.as_array(), Tensor::column(vec![0.5, 0.5]).as_array()));
    }

    #[test]
    fn test_calc_loss() {
        let probabilities = softmax(&Tensor::column(vec![0.6, 0.7, 0.4]));
        let target = Tensor::column(vec![0.0, 1.0, 0.0]);
        let loss = calc_loss(&probabilities, &target).unwrap();
        assert!((loss - 0.97291862).abs() < 1e-6);
    }

    #[test]
    fn test_calc_loss_invalid_target() {
        let probabilities = Tensor::column(vec![0.5, 0.5]);
        let zeros = Tensor::column(vec![0.0, 0.0]);
        let two_hot = Tensor::column(vec![1.0, 1.0]);
        let soft = Tensor::column(vec![0.3, 0.7]);
        let wrong_len = Tensor::column(vec![1.0, 0.0, 0.0]);

        for target in [zeros, two_hot, soft, wrong_len] {
            assert!(matches!(calc_loss(&probabilities, &target), Err(ConvNetError::InvalidTarget(_))));
        }
    }

    #[test]
    fn test_calc_loss_grad() {
        let probabilities = Tensor::column(vec![0.2, 0.5, 0.3]);
        let target = Tensor::column(vec![0.0, 0.0, 1.0]);
        let expected = Tensor::column(vec![0.2, 0.5, -0.7]);
        let result = calc_loss_grad(&probabilities, &target).unwrap();
        assert!(arrays_almost_equal(result.as_array(), expected.as_array()));
    }
}
