use crate::nn::layers::nn_layers::loss_layer;
use crate::nn::model::{Model, SampleResult};
use crate::nn::tensor::Tensor;
use crate::utils::{GenericResult, F};

impl Model {
    /// Forward **inputs** and compare the result with **target**, without updating any parameter
    pub fn evaluate(&mut self, inputs: Tensor, target: &Tensor) -> GenericResult<SampleResult> {
        let predicted = self.predict(inputs)?;
        let loss = loss_layer(self.last_layer()?, target)?;
        Ok(SampleResult {
            correct: predicted.argmax() == target.argmax(),
            loss,
        })
    }
}

/// Running totals of many [SampleResult]s
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Metrics {
    pub count: usize,
    pub correct: usize,
    pub total_loss: F,
}

impl Metrics {
    pub fn record(&mut self, result: &SampleResult) {
        self.count += 1;
        self.total_loss += result.loss;
        if result.correct {
            self.correct += 1;
        }
    }

    /// Fraction of correct samples, 0 when nothing was recorded
    pub fn accuracy(&self) -> F {
        if self.count == 0 {
            0.0
        } else {
            self.correct as F / self.count as F
        }
    }

    pub fn average_loss(&self) -> F {
        if self.count == 0 {
            0.0
        } else {
            self.total_loss / self.count as F
        }
    }
}
