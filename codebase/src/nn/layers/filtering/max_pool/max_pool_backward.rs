use crate::error::ConvNetError;
use crate::nn::layers::filtering::max_pool::MaxPoolLayer;
use crate::nn::layers::nn_layers::{BackwardData, LayerResult};
use crate::nn::tensor::{Shape, Tensor};

/// Route each output gradient to the input that was the maximum of its window. When windows
/// overlap, a later output overwrites what an earlier one wrote.
pub fn backward(layer: &mut MaxPoolLayer, data: BackwardData) -> LayerResult {
    let BackwardData { grad } = data;
    grad.check_shape(layer.output_shape)?;
    if layer.argmax.len() != layer.output_shape.len() {
        return Err(ConvNetError::NotInitialized(layer.state.name.clone()));
    }

    let Shape { height, width, depth } = layer.output_shape;
    let mut grad_input = Tensor::zeros(layer.input_shape);
    let mut argmax = layer.argmax.iter();

    for h in 0..height {
        for w in 0..width {
            for c in 0..depth {
                if let Some(&coord) = argmax.next() {
                    grad_input[coord] = grad[(h, w, c)];
                }
            }
        }
    }

    layer.state.grad_input = grad_input;
    Ok(layer.state.grad_input.clone())
}
