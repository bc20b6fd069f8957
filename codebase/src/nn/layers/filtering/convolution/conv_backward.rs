use log::trace;
use ndarray::s;
use crate::error::ConvNetError;
use crate::nn::layers::filtering::convolution::{ConvolutionConfig, ConvolutionLayer};
use crate::nn::layers::filtering::{pad3d, remove_padding_3d};
use crate::nn::layers::nn_layers::{BackwardData, LayerResult};
use crate::nn::tensor::Tensor;
use crate::utils::Array3F;

/// Besides the gradient of the inputs, computes
/// * grad_bias[c] = sum of the output gradient of channel c
/// * grad_weights[c] = output gradient of channel c cross-correlated against the padded inputs,
///   using the same windows as the forward pass
pub fn backward(layer: &mut ConvolutionLayer, data: BackwardData) -> LayerResult {
    let BackwardData { grad } = data;
    grad.check_shape(layer.output_shape)?;
    if layer.state.input.shape() != layer.input_shape {
        return Err(ConvNetError::NotInitialized(layer.state.name.clone()));
    }

    let ConvolutionConfig { size, stride, padding, .. } = layer.config;
    let padded = pad3d(layer.state.input.as_array(), padding);
    let grad = grad.as_array();
    let (_, height, width) = grad.dim();

    let mut padded_input_grad = Array3F::zeros(padded.raw_dim());
    for (c, channel_grad) in grad.outer_iter().enumerate() {
        let kernel = layer.weights[c].as_array();
        let kernel_grad = layer.grad_weights[c].as_array_mut();
        kernel_grad.fill(0.0);

        for h in 0..height {
            for w in 0..width {
                let g = channel_grad[(h, w)];
                let h_offset = h * stride;
                let w_offset = w * stride;

                padded_input_grad
                    .slice_mut(s![.., h_offset..(h_offset + size), w_offset..(w_offset + size)])
                    .scaled_add(g, kernel);
                kernel_grad.scaled_add(g, &padded.slice(s![.., h_offset..(h_offset + size), w_offset..(w_offset + size)]));
            }
        }

        layer.grad_bias[c] = channel_grad.sum();
    }

    trace!("Convolution '{}' backward", layer.state.name);
    layer.state.grad_input = Tensor::from_array(remove_padding_3d(padded_input_grad, padding));
    Ok(layer.state.grad_input.clone())
}
