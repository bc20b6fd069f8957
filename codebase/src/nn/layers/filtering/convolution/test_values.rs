use ndarray::array;
use crate::nn::layers::filtering::convolution::{ConvolutionConfig, ConvolutionLayer};
use crate::nn::tensor::{Shape, Tensor};

pub fn ones_2x2() -> Tensor {
    Tensor::from_array(array![[[1.0, 1.0], [1.0, 1.0]]])
}

pub fn diagonal_2x2() -> Tensor {
    Tensor::from_array(array![[[1.0, 0.0], [0.0, 1.0]]])
}

pub fn binary_4x4() -> Tensor {
    Tensor::from_array(array![[
        [1.0, 1.0, 0.0, 1.0],
        [0.0, 1.0, 0.0, 0.0],
        [1.0, 0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0, 1.0]
    ]])
}

pub fn diagonal_on_binary_4x4() -> Tensor {
    Tensor::from_array(array![[
        [2.0, 1.0, 0.0],
        [0.0, 2.0, 0.0],
        [2.0, 0.0, 2.0]
    ]])
}

pub fn single_filter_layer(kernel: Tensor, stride: usize, padding: usize, input_shape: Shape) -> ConvolutionLayer {
    let config = ConvolutionConfig {
        filters: 1,
        size: kernel.shape().height,
        stride,
        padding,
    };
    ConvolutionLayer::from_parts("conv", input_shape, config, vec![kernel], vec![0.0]).unwrap()
}

pub fn two_channel_layer() -> ConvolutionLayer {
    let config = ConvolutionConfig { filters: 2, size: 2, stride: 1, padding: 0 };
    let weights = vec![
        Tensor::from_array(array![[[1.0, 0.0], [0.0, 1.0]], [[0.0, 1.0], [1.0, 0.0]]]),
        Tensor::from_array(array![[[0.5, 0.0], [0.0, 0.0]], [[0.0, 0.0], [0.0, -1.0]]]),
    ];
    ConvolutionLayer::from_parts("conv", Shape::new(3, 3, 2), config, weights, vec![0.1, -0.2]).unwrap()
}

pub fn two_channel_input() -> Tensor {
    Tensor::from_array(array![
        [[1.0, 2.0, 0.0], [0.0, 1.0, 3.0], [2.0, 1.0, 0.0]],
        [[0.0, 1.0, 1.0], [1.0, 0.0, 0.0], [2.0, 2.0, 1.0]]
    ])
}

pub fn two_channel_output() -> Tensor {
    Tensor::from_array(array![
        [[4.1, 6.1], [3.1, 3.1]],
        [[0.3, 0.8], [-2.2, -0.7]]
    ])
}
