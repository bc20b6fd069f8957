use ndarray_rand::rand::RngCore;
use crate::error::ConvNetError;
use crate::integration::serialization::LayerRecord;
use crate::nn::layers::nn_layers::{BackwardData, ForwardData, LayerOps, LayerResult, LayerState};
use crate::nn::tensor::{Shape, Tensor};
use crate::utils::{get_dims_after_filter, Array1F, GenericResult, F};

mod conv_forward;
mod conv_init;
mod conv_backward;
mod conv_train;

#[cfg(test)]
mod test_values;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvolutionConfig {
    pub filters: usize,
    pub size: usize,
    pub stride: usize,
    pub padding: usize,
}

impl ConvolutionConfig {
    /// Shape produced for an input of **input_shape**, or an error if the filters can't be
    /// applied to it
    pub fn output_shape(&self, input_shape: Shape) -> GenericResult<Shape> {
        let ConvolutionConfig { filters, size, stride, padding } = *self;
        if filters == 0 || size == 0 || stride == 0 {
            return Err(ConvNetError::InvalidConfig(format!(
                "convolution needs at least one filter, a positive size and a positive stride ({:?})",
                self
            )));
        }
        if input_shape.is_empty() {
            return Err(ConvNetError::InvalidConfig(format!("convolution input can't be empty: {}", input_shape)));
        }

        let height = get_dims_after_filter(input_shape.height, size, stride, padding);
        let width = get_dims_after_filter(input_shape.width, size, stride, padding);
        let output_shape = match (height, width) {
            (Some(height), Some(width)) => Shape::new(height, width, filters),
            _ => return Err(ConvNetError::InvalidConfig(format!(
                "filter of size {} with padding {} doesn't fit input {}",
                size, padding, input_shape
            ))),
        };

        // Every buffer the layer allocates must have a representable size
        let padded_shape = Shape::new(
            input_shape.height.saturating_add(padding.saturating_mul(2)),
            input_shape.width.saturating_add(padding.saturating_mul(2)),
            input_shape.depth,
        );
        let kernel_shape = Shape::new(size, size, input_shape.depth);
        for shape in [padded_shape, kernel_shape, output_shape] {
            if shape.checked_len().is_none() {
                return Err(ConvNetError::InvalidConfig(format!("convolution shape {} is too large", shape)));
            }
        }
        Ok(output_shape)
    }
}

/// Convolution layer (cross-correlation, the filters aren't flipped)
#[derive(Clone, Debug)]
pub struct ConvolutionLayer {
    state: LayerState,
    config: ConvolutionConfig,
    input_shape: Shape,
    output_shape: Shape,
    /// One (size, size, input depth) tensor per filter
    weights: Vec<Tensor>,
    bias: Array1F,
    grad_weights: Vec<Tensor>,
    grad_bias: Array1F,
    velocities: Vec<Tensor>,
}

impl ConvolutionLayer {
    /// Create a layer with 'He normal' filters and zero biases
    pub fn new(name: impl Into<String>, input_shape: Shape, config: ConvolutionConfig, rng: &mut dyn RngCore) -> GenericResult<Self> {
        conv_init::init(name.into(), input_shape, config, rng)
    }

    /// Create a layer with the given filters and biases
    pub fn from_parts(name: impl Into<String>, input_shape: Shape, config: ConvolutionConfig, weights: Vec<Tensor>, bias: Vec<F>) -> GenericResult<Self> {
        conv_init::from_parts(name.into(), input_shape, config, weights, bias)
    }

    pub fn config(&self) -> &ConvolutionConfig {
        &self.config
    }

    pub fn input_shape(&self) -> Shape {
        self.input_shape
    }

    pub fn weights(&self) -> &[Tensor] {
        &self.weights
    }

    pub fn bias(&self) -> &Array1F {
        &self.bias
    }

    pub fn grad_weights(&self) -> &[Tensor] {
        &self.grad_weights
    }

    pub fn grad_bias(&self) -> &Array1F {
        &self.grad_bias
    }
}

impl LayerOps for ConvolutionLayer {
    fn forward(&mut self, data: ForwardData) -> LayerResult {
        conv_forward::forward(self, data)
    }

    fn backward(&mut self, data: BackwardData) -> LayerResult {
        conv_backward::backward(self, data)
    }

    fn serialize(&self) -> GenericResult<LayerRecord> {
        let Shape { height, width, depth } = self.input_shape;
        let ConvolutionConfig { filters, size, stride, padding } = self.config;
        Ok(LayerRecord::Conv {
            name: self.state.name.clone(),
            height,
            width,
            depth,
            f_count: filters,
            f_size: size,
            stride,
            padding,
            weights: self.weights.iter().map(|o| o.to_vec()).collect(),
            bias: self.bias.to_vec(),
        })
    }

    fn state(&self) -> &LayerState {
        &self.state
    }

    fn input_shape(&self) -> Option<Shape> {
        Some(self.input_shape)
    }

    fn output_shape(&self) -> Option<Shape> {
        Some(self.output_shape)
    }

    fn accepts(&self, shape: Shape) -> bool {
        shape == self.input_shape
    }
}
