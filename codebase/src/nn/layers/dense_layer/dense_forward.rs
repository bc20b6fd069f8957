use log::{debug, trace};
use crate::error::ConvNetError;
use crate::nn::layers::dense_layer::*;
use crate::utils::Array1F;

/// `output(n) = bias(n) + sum_i(input(i) * weights(i, n))`, where the input is read in its
/// flat (channel-major) order whatever its shape
pub fn forward(layer: &mut DenseLayer, data: ForwardData) -> LayerResult {
    let ForwardData { inputs, rng } = data;
    if inputs.is_empty() {
        return Err(ConvNetError::InvalidConfig(format!("dense layer '{}' received an empty input", layer.state.name)));
    }

    if let DenseParams::Uninitialized { hidden } = layer.params {
        debug!("Initializing dense layer '{}': {} -> {}", layer.state.name, inputs.len(), hidden);
        layer.params = DenseParams::Ready(DenseWeights::random(inputs.len(), hidden, rng)?);
    }

    let params = layer.ready()?;
    if inputs.len() != params.input_size() {
        return Err(ConvNetError::shape_mismatch(Shape::column(params.input_size()), inputs.shape()));
    }

    let flat = Array1F::from(inputs.to_vec());
    let bias = matrix(&params.bias).column(0).to_owned();
    let output = flat.dot(&matrix(&params.weights)) + bias;

    trace!("Dense '{}' forward {} -> {}", layer.state.name, inputs.shape(), output.len());
    layer.state.input = inputs;
    layer.state.output = Tensor::column(output.to_vec());
    Ok(layer.state.output.clone())
}
