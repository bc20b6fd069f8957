use log::trace;
use crate::nn::layers::nn_layers::*;
use crate::nn::loss::cross_entropy_loss::calc_loss_grad;
use crate::nn::model::{Model, SampleResult};
use crate::nn::tensor::Tensor;
use crate::nn::train_config::TrainConfig;
use crate::utils::GenericResult;

impl Model {
    /// Execute the following steps to train the model based on **inputs** and its label
    /// 1) Evaluate the model output for the given inputs (forward propagation)
    /// 2) Calculate the loss between the output and **target**
    /// 3) Calculate the gradient of that loss with respect to the softmax inputs
    /// 4) Walk the layers backwards, finding the gradients of all parameters (backward propagation)
    /// 5) Update the parameters of each layer right after its backward pass
    /// #####
    /// Returns whether the prediction was correct and the loss, both from before the update
    pub fn fit(&mut self, inputs: Tensor, target: &Tensor, config: &TrainConfig) -> GenericResult<SampleResult> {
        let predicted = self.predict(inputs)?;
        let correct = predicted.argmax() == target.argmax();
        let loss = loss_layer(self.last_layer()?, target)?;
        let mut grad = calc_loss_grad(&predicted, target)?;

        let mut next_kind = None;
        for layer in self.layers.iter_mut().rev() {
            // Dense layers work on flattened tensors
            if next_kind == Some(LayerKind::Fc) {
                grad = grad.reshape(layer.output().shape())?;
            }

            trace!("Backward '{}' with {}", layer.name(), grad.shape());
            grad = backward_layer(layer, BackwardData { grad })?;
            train_layer(layer, TrainData { config })?;
            next_kind = Some(layer.kind());
        }

        Ok(SampleResult { correct, loss })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use crate::error::ConvNetError;
    use crate::nn::layers::activation::relu_layer::ReluLayer;
    use crate::nn::layers::dense_layer::{DenseLayer, DenseParams};
    use crate::nn::layers::softmax_layer::SoftmaxLayer;
    use crate::nn::tensor::Shape;
    use super::*;

    fn get_model() -> Model {
        let mut model = Model::with_seed(3);
        model.add(Layer::Relu(ReluLayer::new("relu", Shape::new(2, 2, 1)))).unwrap();
        let weights = Tensor::from_array(array![[[0.5, -0.5], [0.1, 0.2], [-0.3, 0.3], [0.0, 1.0]]]);
        let dense = DenseLayer::from_parts("fc", weights, Tensor::zeros(Shape::column(2))).unwrap();
        model.add(Layer::Dense(dense)).unwrap();
        model.add(Layer::Softmax(SoftmaxLayer::new("softmax", 2).unwrap())).unwrap();
        model
    }

    fn dense_weights(model: &Model) -> Tensor {
        match &model.layers()[1] {
            Layer::Dense(l) => match l.params() {
                DenseParams::Ready(p) => p.weights.clone(),
                DenseParams::Uninitialized { .. } => panic!("Dense layer without weights"),
            },
            _ => panic!("Expected a dense layer"),
        }
    }

    #[test]
    fn test_fit_reduces_loss() {
        let mut model = get_model();
        let inputs = Tensor::from_vec(Shape::new(2, 2, 1), vec![1.0, 2.0, -1.0, 0.5]).unwrap();
        let target = Tensor::column(vec![1.0, 0.0]);
        let config = TrainConfig::new(0.05);

        let first = model.fit(inputs.clone(), &target, &config).unwrap();
        let mut last = first;
        for _ in 0..20 {
            last = model.fit(inputs.clone(), &target, &config).unwrap();
        }
        assert!(last.loss < first.loss, "{} >= {}", last.loss, first.loss);
        assert!(last.correct);
    }

    #[test]
    fn test_fit_reshapes_grad_before_dense() {
        let mut model = get_model();
        let inputs = Tensor::from_vec(Shape::new(2, 2, 1), vec![1.0, 2.0, -1.0, 0.5]).unwrap();
        model.fit(inputs, &Tensor::column(vec![0.0, 1.0]), &TrainConfig::new(0.1)).unwrap();

        let relu = &model.layers()[0];
        assert_eq!(relu.grad_input().shape(), Shape::new(2, 2, 1));
    }

    #[test]
    fn test_fit_invalid_target_keeps_weights() {
        let mut model = get_model();
        let before = dense_weights(&model);
        let inputs = Tensor::from_vec(Shape::new(2, 2, 1), vec![1.0, 2.0, -1.0, 0.5]).unwrap();

        let result = model.fit(inputs, &Tensor::column(vec![0.5, 0.5]), &TrainConfig::new(0.1));
        assert!(matches!(result, Err(ConvNetError::InvalidTarget(_))));
        assert_eq!(dense_weights(&model), before);
    }
}
