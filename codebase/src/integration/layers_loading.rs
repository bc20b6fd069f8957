use std::{error::Error, fmt::Display};
use log::debug;
use xmltree::{Element, XMLNode};
use crate::error::ConvNetError;
use crate::nn::layers::activation::relu_layer::ReluLayer;
use crate::nn::layers::dense_layer::DenseLayer;
use crate::nn::layers::filtering::convolution::{ConvolutionConfig, ConvolutionLayer};
use crate::nn::layers::filtering::max_pool::{MaxPoolConfig, MaxPoolLayer};
use crate::nn::layers::nn_layers::Layer;
use crate::nn::layers::softmax_layer::SoftmaxLayer;
use crate::nn::model::Model;
use crate::nn::tensor::Shape;
use crate::utils::GenericResult;

#[derive(Debug)]
pub enum XmlError {
    Parse(String),
    ElementNotFound(&'static str),
    UnexpectedTag(String),
    AttributeNotFound(String, &'static str),
    AttributeParseError(String, &'static str, String),
}

impl Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Invalid XML: {}", e)?,
            Self::ElementNotFound(e) => write!(f, "Element <{}> not found", e)?,
            Self::UnexpectedTag(e) => write!(f, "Unexpected tag <{}>", e)?,
            Self::AttributeNotFound(tag, name) => {
                write!(f, "Attribute '{}' not found in <{}>", name, tag)?
            }
            Self::AttributeParseError(tag, name, value) => write!(
                f,
                "Value '{}' isn't in the correct format for attribute '{}' in tag <{}>",
                value, name, tag
            )?,
        }
        Ok(())
    }
}

impl Error for XmlError {}

/// Build a randomly initialized model from an architecture file like
/// ```xml
/// <ConvNet height="32" width="32" depth="3">
///     <Conv name="conv" filters="8" size="5" stride="1" padding="2"/>
///     <ReLU name="relu"/>
///     <MaxPool name="pool" size="2" stride="2"/>
///     <FC name="fc" hidden="10"/>
///     <Softmax name="softmax"/>
/// </ConvNet>
/// ```
/// The input of every layer is the output of the previous one. Names are optional.
pub fn load_model_xml(bytes: &[u8], seed: Option<u64>) -> GenericResult<Model> {
    // The XML declaration is only allowed at the very start of the document
    let start = bytes.iter().position(|o| !o.is_ascii_whitespace()).unwrap_or(bytes.len());
    let elements = Element::parse_all(&bytes[start..]).map_err(|e| XmlError::Parse(e.to_string()))?;

    let mut root = None;
    for e in iter_elements(&elements) {
        if e.name != "ConvNet" {
            return Err(XmlError::UnexpectedTag(e.name.clone()).into());
        } else {
            root = Some(e)
        }
    }
    let root = root.ok_or(XmlError::ElementNotFound("ConvNet"))?;

    let mut shape = Shape::new(
        get_usize_attr(root, "height")?,
        get_usize_attr(root, "width")?,
        get_usize_attr(root, "depth")?,
    );
    let mut model = match seed {
        Some(seed) => Model::with_seed(seed),
        None => Model::new(),
    };

    for (i, e) in iter_elements(&root.children).enumerate() {
        let layer = load_layer(e, i, shape, &mut model)?;
        debug!("Architecture layer {}: {} '{}' with input {}", i, layer.kind(), layer.name(), shape);
        shape = layer
            .output_shape()
            .ok_or_else(|| ConvNetError::NotInitialized(layer.name().to_owned()))?;
        model.add(layer)?;
    }

    if model.is_empty() {
        return Err(XmlError::ElementNotFound("Any layer node").into());
    }
    Ok(model)
}

fn load_layer(element: &Element, index: usize, input_shape: Shape, model: &mut Model) -> GenericResult<Layer> {
    let name = |tag: &str| get_name_attr(element, tag, index);

    let layer = match element.name.as_str() {
        "Conv" => {
            let config = ConvolutionConfig {
                filters: get_usize_attr(element, "filters")?,
                size: get_usize_attr(element, "size")?,
                stride: get_usize_attr(element, "stride")?,
                padding: get_usize_attr(element, "padding")?,
            };
            Layer::Convolution(ConvolutionLayer::new(name("conv"), input_shape, config, model.rng_mut())?)
        }
        "ReLU" => Layer::Relu(ReluLayer::new(name("relu"), input_shape)),
        "MaxPool" => {
            let config = MaxPoolConfig {
                size: get_usize_attr(element, "size")?,
                stride: get_usize_attr(element, "stride")?,
            };
            Layer::MaxPool(MaxPoolLayer::new(name("pool"), input_shape, config)?)
        }
        "FC" => {
            let hidden = get_usize_attr(element, "hidden")?;
            Layer::Dense(DenseLayer::with_input(name("fc"), input_shape, hidden, model.rng_mut())?)
        }
        "Softmax" => {
            let height = input_shape
                .checked_len()
                .ok_or_else(|| ConvNetError::InvalidConfig(format!("softmax input {} is too large", input_shape)))?;
            Layer::Softmax(SoftmaxLayer::new(name("softmax"), height)?)
        }
        _ => return Err(XmlError::UnexpectedTag(element.name.clone()).into()),
    };
    Ok(layer)
}

fn iter_elements(elements: &[XMLNode]) -> impl Iterator<Item = &Element> {
    elements.iter().filter_map(|o| o.as_element())
}

fn get_name_attr(element: &Element, tag: &str, index: usize) -> String {
    element
        .attributes
        .get("name")
        .cloned()
        .unwrap_or_else(|| format!("{}_{}", tag, index))
}

fn get_usize_attr(element: &Element, name: &'static str) -> Result<usize, XmlError> {
    let value = element
        .attributes
        .get(name)
        .ok_or_else(|| XmlError::AttributeNotFound(element.name.clone(), name))?;

    value
        .parse()
        .map_err(|_| XmlError::AttributeParseError(element.name.clone(), name, value.clone()))
}
