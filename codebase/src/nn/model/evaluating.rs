use log::trace;
use crate::error::ConvNetError;
use crate::nn::layers::nn_layers::{forward_layer, ForwardData};
use crate::nn::model::Model;
use crate::nn::tensor::Tensor;
use crate::utils::GenericResult;

impl Model {
    /// Pass **inputs** through every layer in order and return the output of the last one
    pub fn predict(&mut self, inputs: Tensor) -> GenericResult<Tensor> {
        if self.layers.is_empty() {
            return Err(ConvNetError::EmptyModel);
        }

        let Model { layers, rng } = self;
        let mut current = inputs;
        for layer in layers.iter_mut() {
            trace!("Forward '{}' with {}", layer.name(), current.shape());
            current = forward_layer(layer, ForwardData { inputs: current, rng: &mut *rng })?;
        }
        Ok(current)
    }
}
