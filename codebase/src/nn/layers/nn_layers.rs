use std::fmt::{Display, Formatter};
use ndarray_rand::rand::RngCore;
use crate::integration::serialization::LayerRecord;
use crate::nn::layers::activation::relu_layer::ReluLayer;
use crate::nn::layers::dense_layer::DenseLayer;
use crate::nn::layers::filtering::convolution::ConvolutionLayer;
use crate::nn::layers::filtering::max_pool::MaxPoolLayer;
use crate::nn::layers::softmax_layer::SoftmaxLayer;
use crate::nn::tensor::{Shape, Tensor};
use crate::nn::train_config::TrainConfig;
use crate::utils::{GenericResult, F};

/// Enum to represent the layers that create the model, each one with its parameters
#[derive(Clone, Debug)]
pub enum Layer {
    /// Slide F filters of size k x k x depth through the zero-padded input, computing the sum of
    /// the product between each filter and the values under it, plus a bias per filter.
    /// ### Trainable
    /// * Filters (Nesterov momentum)
    /// * Biases (plain gradient descent)
    /// https://en.wikipedia.org/wiki/Convolutional_neural_network
    Convolution(ConvolutionLayer),

    /// Apply the leaky Rectified Linear Unit (ReLu) activation function. That means:
    /// * For x >= 0: x
    /// * For x < 0: 0.1 * x
    Relu(ReluLayer),

    /// Take the maximum of each q x q window of every channel. Use for reducing the size of arrays
    /// after **Convolution**.
    /// https://deepai.org/machine-learning-glossary-and-terms/max-pooling
    MaxPool(MaxPoolLayer),

    /// Fully connected layer: flatten the input and multiply it by a weights matrix, then add
    /// a biases vector. Weights may be created lazily on the first forward pass.
    /// ### Trainable
    /// * Weights (Nesterov momentum)
    /// * Biases (plain gradient descent)
    Dense(DenseLayer),

    /// Turn a column of scores into probabilities. Always the last layer, it is also the one that
    /// computes the cross-entropy loss.
    Softmax(SoftmaxLayer),
}

/// Tag identifying the type of a layer, as written in model documents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Conv,
    Relu,
    Pool,
    Fc,
    Softmax,
}

impl LayerKind {
    pub fn tag(&self) -> &'static str {
        match self {
            LayerKind::Conv => "conv",
            LayerKind::Relu => "relu",
            LayerKind::Pool => "pool",
            LayerKind::Fc => "fc",
            LayerKind::Softmax => "softmax",
        }
    }
}

impl Display for LayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Tensors kept by every layer from its most recent passes
#[derive(Clone, Debug, Default)]
pub struct LayerState {
    pub name: String,
    pub input: Tensor,
    pub output: Tensor,
    pub grad_input: Tensor,
}

impl LayerState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

pub struct ForwardData<'a> {
    pub inputs: Tensor,
    /// Used by layers that create their parameters lazily
    pub rng: &'a mut dyn RngCore,
}

pub struct BackwardData {
    /// Gradient of the loss with respect to the layer output. Must have the output's shape.
    pub grad: Tensor,
}

pub struct TrainData<'a> {
    pub config: &'a TrainConfig,
}

pub type EmptyLayerResult = GenericResult<()>;
pub type LayerResult = GenericResult<Tensor>;

pub trait LayerOps {
    /// Store the inputs and compute the output, which is also returned
    fn forward(&mut self, data: ForwardData) -> LayerResult;

    /// Compute the gradient with respect to the inputs (returned) and to the parameters
    fn backward(&mut self, data: BackwardData) -> LayerResult;

    /// Record with everything needed to rebuild the layer
    fn serialize(&self) -> GenericResult<LayerRecord>;

    fn state(&self) -> &LayerState;

    /// None when any input with the right number of elements is accepted
    fn input_shape(&self) -> Option<Shape>;

    /// None while it depends on an input that hasn't been seen yet
    fn output_shape(&self) -> Option<Shape>;

    /// Whether an input of this shape can be passed to **forward**
    fn accepts(&self, shape: Shape) -> bool;
}

pub trait TrainableLayerOps {
    /// Apply one optimizer step with the gradients of the last **backward**
    fn train(&mut self, data: TrainData) -> EmptyLayerResult;
}

/// Call **forward** in the appropriate layer
pub fn forward_layer(layer: &mut Layer, data: ForwardData) -> LayerResult {
    use Layer::*;
    match layer {
        Convolution(l) => l.forward(data),
        Relu(l) => l.forward(data),
        MaxPool(l) => l.forward(data),
        Dense(l) => l.forward(data),
        Softmax(l) => l.forward(data),
    }
}

/// Call **backward** in the appropriate layer
pub fn backward_layer(layer: &mut Layer, data: BackwardData) -> LayerResult {
    use Layer::*;
    match layer {
        Convolution(l) => l.backward(data),
        Relu(l) => l.backward(data),
        MaxPool(l) => l.backward(data),
        Dense(l) => l.backward(data),
        Softmax(l) => l.backward(data),
    }
}

/// Call **train** in the appropriate layer. If the layer doesn't have parameters, nothing
/// will happen.
pub fn train_layer(layer: &mut Layer, data: TrainData) -> EmptyLayerResult {
    use Layer::*;
    match layer {
        Convolution(l) => l.train(data),
        Dense(l) => l.train(data),
        _ => Ok(()),
    }
}

/// Cross-entropy loss of the last output. Only meaningful for **Softmax**, every other layer
/// returns 0.
pub fn loss_layer(layer: &Layer, target: &Tensor) -> GenericResult<F> {
    match layer {
        Layer::Softmax(l) => l.loss(target),
        _ => Ok(0.0),
    }
}

impl Layer {
    fn ops(&self) -> &dyn LayerOps {
        use Layer::*;
        match self {
            Convolution(l) => l,
            Relu(l) => l,
            MaxPool(l) => l,
            Dense(l) => l,
            Softmax(l) => l,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Convolution(_) => LayerKind::Conv,
            Layer::Relu(_) => LayerKind::Relu,
            Layer::MaxPool(_) => LayerKind::Pool,
            Layer::Dense(_) => LayerKind::Fc,
            Layer::Softmax(_) => LayerKind::Softmax,
        }
    }

    pub fn name(&self) -> &str {
        &self.ops().state().name
    }

    pub fn input(&self) -> &Tensor {
        &self.ops().state().input
    }

    pub fn output(&self) -> &Tensor {
        &self.ops().state().output
    }

    pub fn grad_input(&self) -> &Tensor {
        &self.ops().state().grad_input
    }

    pub fn input_shape(&self) -> Option<Shape> {
        self.ops().input_shape()
    }

    pub fn output_shape(&self) -> Option<Shape> {
        self.ops().output_shape()
    }

    pub fn accepts(&self, shape: Shape) -> bool {
        self.ops().accepts(shape)
    }

    pub fn serialize(&self) -> GenericResult<LayerRecord> {
        self.ops().serialize()
    }
}
