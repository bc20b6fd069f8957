use crate::nn::layers::filtering::convolution::ConvolutionLayer;
use crate::nn::layers::nn_layers::{EmptyLayerResult, TrainableLayerOps, TrainData};
use crate::nn::lr_calculators::constant_lr::apply_constant;
use crate::nn::lr_calculators::momentum_lr::apply_momentum;

impl TrainableLayerOps for ConvolutionLayer {
    fn train(&mut self, data: TrainData) -> EmptyLayerResult {
        let TrainData { config } = data;

        let kernels = self.weights.iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(self.grad_weights.iter());
        for ((kernel, velocity), grad) in kernels {
            apply_momentum(kernel.as_array_mut(), velocity.as_array_mut(), grad.as_array(), config);
        }

        apply_constant(&mut self.bias, &self.grad_bias, config);
        Ok(())
    }
}
