use log::trace;
use ndarray::{s, Zip};
use crate::nn::layers::filtering::convolution::{ConvolutionConfig, ConvolutionLayer};
use crate::nn::layers::filtering::pad3d;
use crate::nn::layers::nn_layers::{ForwardData, LayerResult};
use crate::nn::tensor::{Shape, Tensor};
use crate::utils::Array3F;

pub fn forward(layer: &mut ConvolutionLayer, data: ForwardData) -> LayerResult {
    let ForwardData { inputs, .. } = data;
    inputs.check_shape(layer.input_shape)?;

    let ConvolutionConfig { size, stride, padding, .. } = layer.config;
    let Shape { height, width, depth } = layer.output_shape;
    let padded = pad3d(inputs.as_array(), padding);

    let mut output = Array3F::zeros((depth, height, width));
    for (c, (kernel, bias)) in layer.weights.iter().zip(layer.bias.iter()).enumerate() {
        let kernel = kernel.as_array();
        for h in 0..height {
            for w in 0..width {
                let h_offset = h * stride;
                let w_offset = w * stride;
                let area = padded.slice(s![.., h_offset..(h_offset + size), w_offset..(w_offset + size)]);
                output[(c, h, w)] = Zip::from(&area)
                    .and(kernel)
                    .fold(*bias, |acc, &a, &k| acc + a * k);
            }
        }
    }

    trace!("Convolution '{}' forward {} -> {}", layer.state.name, layer.input_shape, layer.output_shape);
    layer.state.input = inputs;
    layer.state.output = Tensor::from_array(output);
    Ok(layer.state.output.clone())
}
