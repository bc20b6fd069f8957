pub mod nn_layers;
pub mod activation;
pub mod filtering;
pub mod dense_layer;
pub mod softmax_layer;
