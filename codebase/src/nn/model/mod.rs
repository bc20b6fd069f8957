mod evaluating;
mod training;
mod testing;

use std::path::Path;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use crate::error::ConvNetError;
use crate::integration::{deserialization, serialization};
use crate::nn::layers::nn_layers::Layer;
use crate::nn::tensor::Shape;
use crate::utils::{GenericResult, F};

pub use testing::Metrics;

/// Main struct to train and use the CNN
/// ```
/// use convnet::nn::layers::nn_layers::Layer;
/// use convnet::nn::layers::dense_layer::DenseLayer;
/// use convnet::nn::layers::softmax_layer::SoftmaxLayer;
/// use convnet::nn::model::Model;
/// use convnet::nn::train_config::TrainConfig;
/// use convnet::{Shape, Tensor};
///
/// let mut model = Model::with_seed(7);
/// let dense = DenseLayer::with_input("fc", Shape::column(2), 2, model.rng_mut()).unwrap();
/// model.add(Layer::Dense(dense)).unwrap();
/// model.add(Layer::Softmax(SoftmaxLayer::new("softmax", 2).unwrap())).unwrap();
///
/// let config = TrainConfig::new(0.01);
/// for _ in 0..10 {
///     let result = model.fit(Tensor::column(vec![1.0, 0.0]), &Tensor::column(vec![1.0, 0.0]), &config).unwrap();
///     assert!(result.loss >= 0.0);
/// }
///
/// let probabilities = model.predict(Tensor::column(vec![1.0, 0.0])).unwrap();
/// assert!((probabilities.sum() - 1.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    layers: Vec<Layer>,
    rng: StdRng,
}

/// Outcome of passing one sample through the model
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleResult {
    /// Whether the most likely class is the target's
    pub correct: bool,
    pub loss: F,
}

impl Model {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Model whose lazily created weights are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self {
            layers: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Random source used to initialize the layers of this model
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Append **layer** to the end of the chain. It must accept the output of the current last layer.
    pub fn add(&mut self, layer: Layer) -> GenericResult<()> {
        if let Some(prev) = self.output_shape() {
            if !layer.accepts(prev) {
                let expected = layer.input_shape().unwrap_or(prev);
                return Err(ConvNetError::shape_mismatch(expected, prev));
            }
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Input expected by the first layer, if it has a fixed one
    pub fn input_shape(&self) -> Option<Shape> {
        self.layers.first().and_then(|o| o.input_shape())
    }

    pub fn output_shape(&self) -> Option<Shape> {
        self.layers.last().and_then(|o| o.output_shape())
    }

    /// Write every layer to a JSON document at **path**
    pub fn save(&self, path: impl AsRef<Path>) -> GenericResult<()> {
        serialization::save_model(self, path.as_ref())
    }

    /// Rebuild a model from a document written by **save**
    pub fn load(path: impl AsRef<Path>) -> GenericResult<Self> {
        deserialization::load_model(path.as_ref())
    }

    fn last_layer(&self) -> GenericResult<&Layer> {
        self.layers.last().ok_or(ConvNetError::EmptyModel)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
