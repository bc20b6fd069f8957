use crate::error::ConvNetError;
use crate::integration::serialization::LayerRecord;
use crate::nn::layers::nn_layers::*;
use crate::nn::loss::cross_entropy_loss::{calc_loss, softmax};
use crate::nn::tensor::{Shape, Tensor};
use crate::utils::{GenericResult, F};

/// Terminal layer. Its backward pass expects the gradient with respect to its *inputs*, which
/// for softmax followed by cross-entropy is `predicted - target`, and passes it through.
#[derive(Clone, Debug)]
pub struct SoftmaxLayer {
    state: LayerState,
    height: usize,
}

impl SoftmaxLayer {
    pub fn new(name: impl Into<String>, height: usize) -> GenericResult<Self> {
        if height == 0 {
            return Err(ConvNetError::InvalidConfig("softmax needs at least one input".to_owned()));
        }
        Ok(Self {
            state: LayerState::new(name),
            height,
        })
    }

    /// Cross-entropy between the last output and a one-hot **target**
    pub fn loss(&self, target: &Tensor) -> GenericResult<F> {
        calc_loss(&self.state.output, target)
    }

    fn shape(&self) -> Shape {
        Shape::column(self.height)
    }
}

impl LayerOps for SoftmaxLayer {
    fn forward(&mut self, data: ForwardData) -> LayerResult {
        let ForwardData { inputs, .. } = data;
        inputs.check_shape(self.shape())?;

        self.state.output = softmax(&inputs);
        self.state.input = inputs;
        Ok(self.state.output.clone())
    }

    fn backward(&mut self, data: BackwardData) -> LayerResult {
        let BackwardData { grad } = data;
        grad.check_shape(self.shape())?;

        self.state.grad_input = grad;
        Ok(self.state.grad_input.clone())
    }

    fn serialize(&self) -> GenericResult<LayerRecord> {
        Ok(LayerRecord::Softmax {
            name: self.state.name.clone(),
            height: self.height,
        })
    }

    fn state(&self) -> &LayerState {
        &self.state
    }

    fn input_shape(&self) -> Option<Shape> {
        Some(self.shape())
    }

    fn output_shape(&self) -> Option<Shape> {
        Some(self.shape())
    }

    fn accepts(&self, shape: Shape) -> bool {
        shape == self.shape()
    }
}
