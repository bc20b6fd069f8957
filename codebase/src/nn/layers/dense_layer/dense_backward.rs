use ndarray::Axis;
use crate::error::ConvNetError;
use crate::nn::layers::dense_layer::*;
use crate::utils::Array1F;

/// Gradients with respect to the flattened input, shaped (input size, 1, 1), and to the
/// parameters. The parameter gradients are replaced on every call. Every bias cell receives the
/// sum of the whole output gradient.
pub fn backward(layer: &mut DenseLayer, data: BackwardData) -> LayerResult {
    let BackwardData { grad } = data;
    let name = layer.state.name.clone();
    let input = Array1F::from(layer.state.input.to_vec());
    let params = match &mut layer.params {
        DenseParams::Ready(p) => p,
        DenseParams::Uninitialized { .. } => return Err(ConvNetError::NotInitialized(name)),
    };

    grad.check_shape(Shape::column(params.hidden()))?;
    if input.len() != params.input_size() {
        return Err(ConvNetError::NotInitialized(name));
    }

    let grad_output = Array1F::from(grad.to_vec());
    let grad_input = matrix(&params.weights).dot(&grad_output);

    let grad_weights = input
        .insert_axis(Axis(1))
        .dot(&grad_output.view().insert_axis(Axis(0)));
    params.grad_weights = Tensor::from_array(grad_weights.insert_axis(Axis(0)));
    params.grad_bias = Tensor::from_elem(params.bias.shape(), grad.sum());

    layer.state.grad_input = Tensor::column(grad_input.to_vec());
    Ok(layer.state.grad_input.clone())
}
