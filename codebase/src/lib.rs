//! Convolutional neural network layers trained one sample at a time with
//! stochastic gradient descent and Nesterov momentum.
//!
//! A [`Model`](nn::model::Model) is a linear chain of [`Layer`](nn::layers::nn_layers::Layer)s.
//! Models can be built in code, from an XML architecture file
//! ([`integration::layers_loading`]) or restored from a JSON document
//! ([`integration::deserialization`]).

pub mod error;
pub mod integration;
pub mod nn;
pub mod utils;

pub use crate::error::ConvNetError;
pub use crate::nn::model::Model;
pub use crate::nn::tensor::{Shape, Tensor};
pub use crate::utils::*;
