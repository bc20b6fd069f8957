mod dense_forward;
mod dense_backward;

use std::collections::BTreeMap;
use log::debug;
use ndarray::{ArrayView2, Axis};
use ndarray_rand::rand::RngCore;
use crate::error::ConvNetError;
use crate::integration::serialization::LayerRecord;
use crate::nn::layers::nn_layers::*;
use crate::nn::lr_calculators::constant_lr::apply_constant;
use crate::nn::lr_calculators::momentum_lr::apply_momentum;
use crate::nn::tensor::{Shape, Tensor};
use crate::utils::{GenericResult, F};

/// Parameters of a [DenseLayer]. The size of the weights depends on the input, so they may only
/// exist after the first forward pass.
#[derive(Clone, Debug)]
pub enum DenseParams {
    Uninitialized { hidden: usize },
    Ready(DenseWeights),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DenseWeights {
    /// (input size, hidden, 1)
    pub weights: Tensor,
    /// (hidden, 1, 1)
    pub bias: Tensor,
    pub grad_weights: Tensor,
    pub grad_bias: Tensor,
    pub velocities: Tensor,
}

impl DenseWeights {
    fn new(weights: Tensor, bias: Tensor) -> Self {
        let zeros = Tensor::zeros(weights.shape());
        Self {
            grad_bias: Tensor::zeros(bias.shape()),
            grad_weights: zeros.clone(),
            velocities: zeros,
            weights,
            bias,
        }
    }

    /// 'He normal' weights and zero biases
    fn random(input_size: usize, hidden: usize, rng: &mut dyn RngCore) -> GenericResult<Self> {
        let weights = Tensor::random(Shape::new(input_size, hidden, 1), rng)?;
        Ok(Self::new(weights, Tensor::zeros(Shape::column(hidden))))
    }

    pub fn input_size(&self) -> usize {
        self.weights.shape().height
    }

    pub fn hidden(&self) -> usize {
        self.weights.shape().width
    }
}

/// Weights as a matrix of (input size, hidden)
fn matrix(weights: &Tensor) -> ArrayView2<F> {
    weights.as_array().index_axis(Axis(0), 0)
}

#[derive(Clone, Debug)]
pub struct DenseLayer {
    state: LayerState,
    params: DenseParams,
}

impl DenseLayer {
    /// Layer whose weights are created on the first forward pass, once the input size is known
    pub fn new(name: impl Into<String>, hidden: usize) -> GenericResult<Self> {
        if hidden == 0 {
            return Err(ConvNetError::InvalidConfig("dense layer needs at least one output".to_owned()));
        }
        Ok(Self {
            state: LayerState::new(name),
            params: DenseParams::Uninitialized { hidden },
        })
    }

    /// Layer with random weights sized for **input_shape**
    pub fn with_input(name: impl Into<String>, input_shape: Shape, hidden: usize, rng: &mut dyn RngCore) -> GenericResult<Self> {
        let mut result = Self::new(name, hidden)?;
        if input_shape.is_empty() {
            return Err(ConvNetError::InvalidConfig(format!("dense layer input can't be empty: {}", input_shape)));
        }
        let input_size = input_shape
            .checked_len()
            .ok_or_else(|| ConvNetError::InvalidConfig(format!("dense layer input {} is too large", input_shape)))?;
        result.params = DenseParams::Ready(DenseWeights::random(input_size, hidden, rng)?);
        debug!("Created dense layer '{}': {} -> {}", result.state.name, input_size, hidden);
        Ok(result)
    }

    /// Layer with the given weights (input size, hidden, 1) and biases (hidden, 1, 1)
    pub fn from_parts(name: impl Into<String>, weights: Tensor, bias: Tensor) -> GenericResult<Self> {
        let Shape { height, width, depth } = weights.shape();
        if depth != 1 || height == 0 {
            return Err(ConvNetError::InvalidConfig(format!("invalid dense weights shape {}", weights.shape())));
        }
        bias.check_shape(Shape::column(width))?;

        let mut result = Self::new(name, width)?;
        result.params = DenseParams::Ready(DenseWeights::new(weights, bias));
        Ok(result)
    }

    pub fn params(&self) -> &DenseParams {
        &self.params
    }

    pub fn hidden(&self) -> usize {
        match &self.params {
            DenseParams::Uninitialized { hidden } => *hidden,
            DenseParams::Ready(p) => p.hidden(),
        }
    }

    fn ready(&self) -> GenericResult<&DenseWeights> {
        match &self.params {
            DenseParams::Ready(p) => Ok(p),
            DenseParams::Uninitialized { .. } => Err(ConvNetError::NotInitialized(self.state.name.clone())),
        }
    }

    fn ready_mut(&mut self) -> GenericResult<&mut DenseWeights> {
        match &mut self.params {
            DenseParams::Ready(p) => Ok(p),
            DenseParams::Uninitialized { .. } => Err(ConvNetError::NotInitialized(self.state.name.clone())),
        }
    }
}

impl LayerOps for DenseLayer {
    fn forward(&mut self, data: ForwardData) -> LayerResult {
        dense_forward::forward(self, data)
    }

    fn backward(&mut self, data: BackwardData) -> LayerResult {
        dense_backward::backward(self, data)
    }

    fn serialize(&self) -> GenericResult<LayerRecord> {
        let params = self.ready()?;
        let weights: BTreeMap<String, Vec<F>> = matrix(&params.weights)
            .outer_iter()
            .enumerate()
            .map(|(i, row)| (i.to_string(), row.to_vec()))
            .collect();

        Ok(LayerRecord::Fc {
            name: self.state.name.clone(),
            input: params.input_size(),
            output: params.hidden(),
            weights,
            bias: params.bias.to_vec(),
        })
    }

    fn state(&self) -> &LayerState {
        &self.state
    }

    fn input_shape(&self) -> Option<Shape> {
        match &self.params {
            DenseParams::Uninitialized { .. } => None,
            DenseParams::Ready(p) => Some(Shape::column(p.input_size())),
        }
    }

    fn output_shape(&self) -> Option<Shape> {
        Some(Shape::column(self.hidden()))
    }

    fn accepts(&self, shape: Shape) -> bool {
        match &self.params {
            DenseParams::Uninitialized { .. } => !shape.is_empty(),
            DenseParams::Ready(p) => shape.checked_len() == Some(p.input_size()),
        }
    }
}

impl TrainableLayerOps for DenseLayer {
    fn train(&mut self, data: TrainData) -> EmptyLayerResult {
        let TrainData { config } = data;
        let params = self.ready_mut()?;

        apply_momentum(
            params.weights.as_array_mut(),
            params.velocities.as_array_mut(),
            params.grad_weights.as_array(),
            config,
        );
        apply_constant(params.bias.as_array_mut(), params.grad_bias.as_array(), config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use ndarray_rand::rand::rngs::StdRng;
    use ndarray_rand::rand::SeedableRng;
    use crate::nn::train_config::TrainConfig;
    use crate::utils::{arrays_almost_equal, Array1F};
    use super::*;

    /// Input [1, 2, 3] against weights [[1, 2], [3, 4], [5, 6]]
    pub(crate) fn get_layer() -> DenseLayer {
        let weights = Tensor::from_array(array![[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]]);
        DenseLayer::from_parts("fc", weights, Tensor::zeros(Shape::column(2))).unwrap()
    }

    pub(crate) fn get_inputs() -> Tensor {
        Tensor::column(vec![1.0, 2.0, 3.0])
    }

    pub(crate) fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    #[test]
    fn test_train() {
        let mut layer = get_layer();
        layer.forward(ForwardData { inputs: get_inputs(), rng: &mut rng() }).unwrap();
        layer.backward(BackwardData { grad: Tensor::column(vec![1.0, -1.0]) }).unwrap();
        layer.train(TrainData { config: &TrainConfig { lr: 0.1, momentum: 0.9 } }).unwrap();

        let params = layer.ready().unwrap();
        // grad_weights(i, n) = input(i) * grad(n), each weight moves by -0.19 * grad_weights
        let expected_weights = array![[[0.81, 2.19], [2.62, 4.38], [4.43, 6.57]]];
        assert!(arrays_almost_equal(params.weights.as_array(), &expected_weights));
        // The output gradient sums to zero, so the biases don't move
        assert!(arrays_almost_equal(&Array1F::from(params.bias.to_vec()), &array![0.0, 0.0]));
    }

    #[test]
    fn test_uninitialized() {
        let mut layer = DenseLayer::new("fc", 3).unwrap();
        assert_eq!(layer.output_shape(), Some(Shape::column(3)));
        assert!(matches!(layer.serialize(), Err(ConvNetError::NotInitialized(_))));
        assert!(matches!(
            layer.backward(BackwardData { grad: Tensor::column(vec![1.0, 1.0, 1.0]) }),
            Err(ConvNetError::NotInitialized(_))
        ));
        assert!(matches!(
            layer.train(TrainData { config: &TrainConfig::default() }),
            Err(ConvNetError::NotInitialized(_))
        ));
        assert!(matches!(DenseLayer::new("fc", 0), Err(ConvNetError::InvalidConfig(_))));
    }

    #[test]
    fn test_serialize() {
        let layer = get_layer();
        match layer.serialize().unwrap() {
            LayerRecord::Fc { name, input, output, weights, bias } => {
                assert_eq!(name, "fc");
                assert_eq!((input, output), (3, 2));
                assert_eq!(weights["0"], vec![1.0, 2.0]);
                assert_eq!(weights["2"], vec![5.0, 6.0]);
                assert_eq!(bias, vec![0.0, 0.0]);
            }
            other => panic!("Unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_accepts() {
        let layer = get_layer();
        assert!(layer.accepts(Shape::column(3)));
        assert!(layer.accepts(Shape::new(1, 3, 1)));
        assert!(!layer.accepts(Shape::column(4)));
        assert!(DenseLayer::new("fc", 2).unwrap().accepts(Shape::new(5, 5, 3)));
        assert!(!layer.accepts(Shape::new(usize::MAX, 3, 1)));
    }

    #[test]
    fn test_with_input_too_large() {
        let result = DenseLayer::with_input("fc", Shape::new(usize::MAX, 2, 1), 2, &mut rng());
        assert!(matches!(result, Err(ConvNetError::InvalidConfig(_))));
        let result = DenseLayer::with_input("fc", Shape::new(usize::MAX / 2, 1, 1), 4, &mut rng());
        assert!(matches!(result, Err(ConvNetError::InvalidConfig(_))));
    }
}
