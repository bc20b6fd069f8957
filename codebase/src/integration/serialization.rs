use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::error::ConvNetError;
use crate::nn::model::Model;
use crate::utils::{GenericResult, F};

/// Prefix of the keys of a model document, followed by the position of the layer
pub const LAYER_KEY_PREFIX: &str = "layer_";

/// Everything needed to rebuild one layer, tagged with its kind in the "type" field
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerRecord {
    Conv {
        name: String,
        height: usize,
        width: usize,
        depth: usize,
        f_count: usize,
        f_size: usize,
        stride: usize,
        padding: usize,
        /// One array per filter, channel-major
        weights: Vec<Vec<F>>,
        bias: Vec<F>,
    },
    Relu {
        name: String,
        height: usize,
        width: usize,
        depth: usize,
    },
    Pool {
        name: String,
        height: usize,
        width: usize,
        depth: usize,
        p_size: usize,
        stride: usize,
    },
    Fc {
        name: String,
        input: usize,
        output: usize,
        /// Input index -> weights connecting it to every output
        weights: BTreeMap<String, Vec<F>>,
        bias: Vec<F>,
    },
    Softmax {
        name: String,
        height: usize,
    },
}

pub fn layer_key(index: usize) -> String {
    format!("{}{}", LAYER_KEY_PREFIX, index)
}

/// JSON object mapping "layer_<i>" to the record of the i-th layer
pub fn serialize_model(model: &Model) -> GenericResult<Value> {
    if model.is_empty() {
        return Err(ConvNetError::EmptyModel);
    }
    let mut result = Map::new();
    for (i, layer) in model.layers().iter().enumerate() {
        let record = layer.serialize()?;
        result.insert(layer_key(i), serde_json::to_value(record)?);
    }
    Ok(Value::Object(result))
}

pub fn save_model(model: &Model, path: &Path) -> GenericResult<()> {
    let document = serialize_model(model)?;
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &document)?;
    info!("Saved model with {} layers to {}", model.len(), path.display());
    Ok(())
}
