use std::fs;
use std::path::Path;
use log::{debug, info};
use serde_json::Value;
use crate::error::ConvNetError;
use crate::integration::serialization::{LayerRecord, LAYER_KEY_PREFIX};
use crate::nn::layers::activation::relu_layer::ReluLayer;
use crate::nn::layers::dense_layer::DenseLayer;
use crate::nn::layers::filtering::convolution::{ConvolutionConfig, ConvolutionLayer};
use crate::nn::layers::filtering::max_pool::{MaxPoolConfig, MaxPoolLayer};
use crate::nn::layers::nn_layers::Layer;
use crate::nn::layers::softmax_layer::SoftmaxLayer;
use crate::nn::model::Model;
use crate::nn::tensor::{Shape, Tensor};
use crate::utils::{GenericResult, F};

fn malformed(message: impl Into<String>) -> ConvNetError {
    ConvNetError::MalformedModel(message.into())
}

/// Rebuild a model from a document produced by
/// [serialize_model](crate::integration::serialization::serialize_model). The order of the
/// layers comes from the numeric suffix of the keys, which must go from 0 to n - 1.
pub fn deserialize_model(document: &Value) -> GenericResult<Model> {
    let object = document
        .as_object()
        .ok_or_else(|| malformed("the document must be a JSON object"))?;
    if object.is_empty() {
        return Err(malformed("the document doesn't have any layers"));
    }

    let mut entries = Vec::with_capacity(object.len());
    for (key, value) in object {
        let index: usize = key
            .strip_prefix(LAYER_KEY_PREFIX)
            .and_then(|o| o.parse().ok())
            .ok_or_else(|| malformed(format!("unexpected key '{}'", key)))?;
        entries.push((index, key, value));
    }
    entries.sort_by_key(|(index, _, _)| *index);

    let mut model = Model::new();
    for (position, (index, key, value)) in entries.into_iter().enumerate() {
        if index != position {
            return Err(malformed(format!("expected key '{}{}', found '{}'", LAYER_KEY_PREFIX, position, key)));
        }

        let record: LayerRecord = serde_json::from_value(value.clone())
            .map_err(|e| malformed(format!("{}: {}", key, e)))?;
        let layer = deserialize_layer(record).map_err(|e| malformed(format!("{}: {}", key, e)))?;
        debug!("Loaded {} layer '{}'", layer.kind(), layer.name());
        model.add(layer).map_err(|e| malformed(format!("{}: {}", key, e)))?;
    }
    Ok(model)
}

pub fn deserialize_layer(record: LayerRecord) -> GenericResult<Layer> {
    let layer = match record {
        LayerRecord::Conv { name, height, width, depth, f_count, f_size, stride, padding, weights, bias } => {
            let config = ConvolutionConfig { filters: f_count, size: f_size, stride, padding };
            let kernel_shape = Shape::new(f_size, f_size, depth);
            let weights = weights
                .into_iter()
                .map(|o| Tensor::from_vec(kernel_shape, o))
                .collect::<GenericResult<Vec<_>>>()?;
            Layer::Convolution(ConvolutionLayer::from_parts(name, Shape::new(height, width, depth), config, weights, bias)?)
        }
        LayerRecord::Relu { name, height, width, depth } => {
            Layer::Relu(ReluLayer::new(name, Shape::new(height, width, depth)))
        }
        LayerRecord::Pool { name, height, width, depth, p_size, stride } => {
            let config = MaxPoolConfig { size: p_size, stride };
            Layer::MaxPool(MaxPoolLayer::new(name, Shape::new(height, width, depth), config)?)
        }
        LayerRecord::Fc { name, input, output, weights, bias } => {
            // Both counts are checked against the data present before anything is allocated
            if bias.len() != output {
                return Err(malformed(format!("expected {} biases, found {}", output, bias.len())));
            }
            if weights.len() != input {
                return Err(malformed(format!("expected {} weight rows, found {}", input, weights.len())));
            }
            let mut values: Vec<F> = Vec::new();
            for i in 0..input {
                let row = weights
                    .get(&i.to_string())
                    .ok_or_else(|| malformed(format!("missing weights of input {}", i)))?;
                if row.len() != output {
                    return Err(malformed(format!("input {} has {} weights instead of {}", i, row.len(), output)));
                }
                values.extend_from_slice(row);
            }
            let weights = Tensor::from_vec(Shape::new(input, output, 1), values)?;
            let bias = Tensor::from_vec(Shape::column(output), bias)?;
            Layer::Dense(DenseLayer::from_parts(name, weights, bias)?)
        }
        LayerRecord::Softmax { name, height } => Layer::Softmax(SoftmaxLayer::new(name, height)?),
    };
    Ok(layer)
}

pub fn load_model(path: &Path) -> GenericResult<Model> {
    let text = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
    let model = deserialize_model(&document)?;
    info!("Loaded model with {} layers from {}", model.len(), path.display());
    Ok(model)
}
