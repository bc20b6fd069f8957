use crate::error::ConvNetError;
use crate::integration::serialization::LayerRecord;
use crate::nn::layers::nn_layers::*;
use crate::nn::tensor::{Shape, Tensor};
use crate::utils::{GenericResult, F};

/// Slope applied to negative values
pub const LEAKY_SLOPE: F = 0.1;

#[derive(Clone, Debug)]
pub struct ReluLayer {
    state: LayerState,
    shape: Shape,
}

impl ReluLayer {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            state: LayerState::new(name),
            shape,
        }
    }
}

impl LayerOps for ReluLayer {
    fn forward(&mut self, data: ForwardData) -> LayerResult {
        let ForwardData { inputs, .. } = data;
        inputs.check_shape(self.shape)?;

        self.state.output = inputs.map(|o| if o >= 0.0 { o } else { LEAKY_SLOPE * o });
        self.state.input = inputs;
        Ok(self.state.output.clone())
    }

    fn backward(&mut self, data: BackwardData) -> LayerResult {
        let BackwardData { grad } = data;
        grad.check_shape(self.shape)?;
        if self.state.input.shape() != self.shape {
            return Err(ConvNetError::NotInitialized(self.state.name.clone()));
        }

        // Gated on the stored input, not on the output
        let gate = self.state.input.map(|o| if o >= 0.0 { 1.0 } else { LEAKY_SLOPE });
        self.state.grad_input = grad.try_mul(&gate)?;
        Ok(self.state.grad_input.clone())
    }

    fn serialize(&self) -> GenericResult<LayerRecord> {
        let Shape { height, width, depth } = self.shape;
        Ok(LayerRecord::Relu {
            name: self.state.name.clone(),
            height,
            width,
            depth,
        })
    }

    fn state(&self) -> &LayerState {
        &self.state
    }

    fn input_shape(&self) -> Option<Shape> {
        Some(self.shape)
    }

    fn output_shape(&self) -> Option<Shape> {
        Some(self.shape)
    }

    fn accepts(&self, shape: Shape) -> bool {
        shape == self.shape
    }
}
