use log::trace;
use crate::nn::layers::filtering::max_pool::{MaxPoolConfig, MaxPoolLayer};
use crate::nn::layers::nn_layers::{ForwardData, LayerResult};
use crate::nn::tensor::{Shape, Tensor};

pub fn forward(layer: &mut MaxPoolLayer, data: ForwardData) -> LayerResult {
    let ForwardData { inputs, .. } = data;
    inputs.check_shape(layer.input_shape)?;

    let MaxPoolConfig { size, stride } = layer.config;
    let Shape { height, width, depth } = layer.output_shape;
    let mut output = Tensor::zeros(layer.output_shape);
    let mut argmax = Vec::with_capacity(output.len());

    for h in 0..height {
        for w in 0..width {
            for c in 0..depth {
                let h_offset = h * stride;
                let w_offset = w * stride;

                // Ties keep the first maximum in row-major order
                let mut best = (h_offset, w_offset, c);
                for row in h_offset..(h_offset + size) {
                    for col in w_offset..(w_offset + size) {
                        if inputs[(row, col, c)] > inputs[best] {
                            best = (row, col, c);
                        }
                    }
                }

                output[(h, w, c)] = inputs[best];
                argmax.push(best);
            }
        }
    }

    trace!("Max pool '{}' forward {} -> {}", layer.state.name, layer.input_shape, layer.output_shape);
    layer.argmax = argmax;
    layer.state.input = inputs;
    layer.state.output = output;
    Ok(layer.state.output.clone())
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;
    use crate::error::ConvNetError;
    use crate::nn::layers::filtering::max_pool::tests::*;
    use crate::nn::layers::nn_layers::LayerOps;
    use super::*;

    fn run(layer: &mut MaxPoolLayer, inputs: Tensor) -> crate::utils::GenericResult<Tensor> {
        layer.forward(ForwardData { inputs, rng: &mut StdRng::seed_from_u64(0) })
    }

    #[test]
    fn test_forward_2x2() {
        let mut layer = create_layer(2, 2);
        let result = run(&mut layer, create_inputs()).unwrap();
        assert_eq!(result, create_forward_outputs());
        assert_eq!(layer.argmax.len(), 8);
        // Production order: row, column, then channel
        assert_eq!(&layer.argmax[..2], &[(1, 1, 0), (1, 1, 1)]);
        assert_eq!(layer.argmax[3], (1, 3, 1));
    }

    #[test]
    fn test_forward_single_window() {
        let mut layer = MaxPoolLayer::new("pool", Shape::new(2, 2, 1), MaxPoolConfig { size: 2, stride: 2 }).unwrap();
        let result = run(&mut layer, Tensor::from_array(array![[[10.0, -20.0], [30.0, 40.0]]])).unwrap();
        assert_eq!(result.to_vec(), vec![40.0]);
        assert_eq!(layer.argmax, vec![(1, 1, 0)]);
    }

    #[test]
    fn test_forward_ties() {
        let mut layer = MaxPoolLayer::new("pool", Shape::new(2, 2, 1), MaxPoolConfig { size: 2, stride: 2 }).unwrap();
        run(&mut layer, Tensor::from_elem(Shape::new(2, 2, 1), 5.0)).unwrap();
        assert_eq!(layer.argmax, vec![(0, 0, 0)]);
    }

    #[test]
    fn test_forward_overlapping() {
        let mut layer = create_layer(3, 1);
        let result = run(&mut layer, create_inputs()).unwrap();
        let expected = Tensor::from_array(array![
            [[11.0, 12.0], [11.0, 12.0]],
            [[69.0, 69.0], [69.0, 69.0]]
        ]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_forward_wrong_shape() {
        let mut layer = create_layer(2, 2);
        let result = run(&mut layer, Tensor::zeros(Shape::new(4, 4, 1)));
        assert!(matches!(result, Err(ConvNetError::ShapeMismatch { .. })));
    }
}
