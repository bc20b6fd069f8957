use log::debug;
use ndarray_rand::rand::RngCore;
use crate::error::ConvNetError;
use crate::nn::layers::filtering::convolution::{ConvolutionConfig, ConvolutionLayer};
use crate::nn::layers::nn_layers::LayerState;
use crate::nn::tensor::{Shape, Tensor};
use crate::utils::{Array1F, GenericResult, F};

pub fn init(name: String, input_shape: Shape, config: ConvolutionConfig, rng: &mut dyn RngCore) -> GenericResult<ConvolutionLayer> {
    // Fails before sampling anything if the config is invalid
    config.output_shape(input_shape)?;

    let kernel_shape = Shape::new(config.size, config.size, input_shape.depth);
    let weights = (0..config.filters)
        .map(|_| Tensor::random(kernel_shape, rng))
        .collect::<GenericResult<Vec<_>>>()?;

    from_parts(name, input_shape, config, weights, vec![0.0; config.filters])
}

pub fn from_parts(name: String, input_shape: Shape, config: ConvolutionConfig, weights: Vec<Tensor>, bias: Vec<F>) -> GenericResult<ConvolutionLayer> {
    let output_shape = config.output_shape(input_shape)?;

    if weights.len() != config.filters || bias.len() != config.filters {
        return Err(ConvNetError::InvalidConfig(format!(
            "expected {} filters and biases, found {} and {}",
            config.filters,
            weights.len(),
            bias.len()
        )));
    }

    let kernel_shape = Shape::new(config.size, config.size, input_shape.depth);
    for kernel in &weights {
        kernel.check_shape(kernel_shape)?;
    }

    debug!("Created convolution '{}': {} -> {}", name, input_shape, output_shape);

    let zeros = vec![Tensor::zeros(kernel_shape); config.filters];
    Ok(ConvolutionLayer {
        state: LayerState::new(name),
        config,
        input_shape,
        output_shape,
        weights,
        bias: Array1F::from(bias),
        grad_weights: zeros.clone(),
        grad_bias: Array1F::zeros(config.filters),
        velocities: zeros,
    })
}

#[cfg(test)]
mod tests {
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;
    use super::*;

    #[test]
    fn test_init() {
        let config = ConvolutionConfig { filters: 4, size: 3, stride: 1, padding: 0 };
        let layer = init("conv".to_owned(), Shape::new(5, 5, 2), config, &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(layer.weights.len(), 4);
        assert!(layer.weights.iter().all(|o| o.shape() == Shape::new(3, 3, 2)));
        assert!(layer.weights.iter().any(|o| o.iter().any(|v| *v != 0.0)));
        assert_eq!(layer.bias, Array1F::zeros(4));
        assert!(layer.velocities.iter().all(|o| o.sum() == 0.0));
        assert_eq!(layer.output_shape, Shape::new(3, 3, 4));
    }

    #[test]
    fn test_from_parts_wrong_kernel() {
        let config = ConvolutionConfig { filters: 1, size: 2, stride: 1, padding: 0 };
        let result = from_parts("conv".to_owned(), Shape::new(3, 3, 1), config, vec![Tensor::zeros(Shape::new(3, 3, 1))], vec![0.0]);
        assert!(matches!(result, Err(ConvNetError::ShapeMismatch { .. })));

        let result = from_parts("conv".to_owned(), Shape::new(3, 3, 1), config, vec![], vec![0.0]);
        assert!(matches!(result, Err(ConvNetError::InvalidConfig(_))));
    }
}
