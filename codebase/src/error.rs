use crate::integration::layers_loading::XmlError;
use crate::nn::tensor::Shape;
use ndarray_rand::rand_distr::NormalError;
use thiserror::Error;

/// Every way an operation of this crate can fail
#[derive(Error, Debug)]
pub enum ConvNetError {
    #[error("Shape mismatch: expected {expected}, found {actual}")]
    ShapeMismatch { expected: Shape, actual: Shape },
    #[error("Can't arrange {len} elements into shape {shape}")]
    ElementCount { len: usize, shape: Shape },
    #[error("Target isn't a valid one-hot vector: {0}")]
    InvalidTarget(String),
    #[error("Layer '{0}' was used before being initialized")]
    NotInitialized(String),
    #[error("Malformed model document: {0}")]
    MalformedModel(String),
    #[error("Invalid layer configuration: {0}")]
    InvalidConfig(String),
    #[error("The model doesn't have any layers")]
    EmptyModel,
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Couldn't decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid architecture file: {0}")]
    Xml(#[from] XmlError),
    #[error("Invalid weights distribution: {0}")]
    Distribution(#[from] NormalError),
}

impl ConvNetError {
    pub(crate) fn shape_mismatch(expected: Shape, actual: Shape) -> Self {
        Self::ShapeMismatch { expected, actual }
    }
}
