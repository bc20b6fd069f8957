mod max_pool_forward;
mod max_pool_backward;

use crate::error::ConvNetError;
use crate::integration::serialization::LayerRecord;
use crate::nn::layers::nn_layers::{BackwardData, ForwardData, LayerOps, LayerResult, LayerState};
use crate::nn::tensor::Shape;
use crate::utils::{get_dims_after_filter, GenericResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxPoolConfig {
    pub size: usize,
    pub stride: usize,
}

/// Coordinates (row, col, channel) of an input element
pub type Coord = (usize, usize, usize);

#[derive(Clone, Debug)]
pub struct MaxPoolLayer {
    state: LayerState,
    config: MaxPoolConfig,
    input_shape: Shape,
    output_shape: Shape,
    /// Position of the maximum of every window in the last forward pass, in the order the
    /// outputs were produced (row, then column, then channel)
    argmax: Vec<Coord>,
}

impl MaxPoolLayer {
    pub fn new(name: impl Into<String>, input_shape: Shape, config: MaxPoolConfig) -> GenericResult<Self> {
        let MaxPoolConfig { size, stride } = config;
        if size == 0 {
            return Err(ConvNetError::InvalidConfig("pool size must be positive".to_owned()));
        }
        if input_shape.checked_len().is_none() {
            return Err(ConvNetError::InvalidConfig(format!("pool input {} is too large", input_shape)));
        }

        let height = get_dims_after_filter(input_shape.height, size, stride, 0);
        let width = get_dims_after_filter(input_shape.width, size, stride, 0);
        let output_shape = match (height, width) {
            (Some(height), Some(width)) => Shape::new(height, width, input_shape.depth),
            _ => return Err(ConvNetError::InvalidConfig(format!(
                "pool of size {} and stride {} doesn't fit input {}",
                size, stride, input_shape
            ))),
        };

        Ok(Self {
            state: LayerState::new(name),
            config,
            input_shape,
            output_shape,
            argmax: Vec::new(),
        })
    }

    pub fn config(&self) -> &MaxPoolConfig {
        &self.config
    }

    pub fn argmax(&self) -> &[Coord] {
        &self.argmax
    }
}

impl LayerOps for MaxPoolLayer {
    fn forward(&mut self, data: ForwardData) -> LayerResult {
        max_pool_forward::forward(self, data)
    }

    fn backward(&mut self, data: BackwardData) -> LayerResult {
        max_pool_backward::backward(self, data)
    }

    fn serialize(&self) -> GenericResult<LayerRecord> {
        let Shape { height, width, depth } = self.input_shape;
        Ok(LayerRecord::Pool {
            name: self.state.name.clone(),
            height,
            width,
            depth,
            p_size: self.config.size,
            stride: self.config.stride,
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
