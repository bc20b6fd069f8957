use std::fs;
use convnet::integration::layers_loading::load_model_xml;
use convnet::nn::layers::activation::relu_layer::ReluLayer;
use convnet::nn::layers::dense_layer::DenseLayer;
use convnet::nn::layers::filtering::convolution::{ConvolutionConfig, ConvolutionLayer};
use convnet::nn::layers::filtering::max_pool::{MaxPoolConfig, MaxPoolLayer};
use convnet::nn::layers::nn_layers::{Layer, LayerKind};
use convnet::nn::layers::softmax_layer::SoftmaxLayer;
use convnet::nn::train_config::TrainConfig;
use convnet::{ConvNetError, Model, Shape, Tensor};
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;

const INPUT_SHAPE: Shape = Shape::new(6, 6, 2);

/// Conv -> ReLU -> MaxPool -> FC -> Softmax, with the dense weights created on the first pass
fn create_model() -> Model {
    let mut model = Model::with_seed(21);
    let config = ConvolutionConfig { filters: 3, size: 3, stride: 1, padding: 1 };
    let conv = ConvolutionLayer::new("conv", INPUT_SHAPE, config, model.rng_mut()).unwrap();
    model.add(Layer::Convolution(conv)).unwrap();
    model.add(Layer::Relu(ReluLayer::new("relu", Shape::new(6, 6, 3)))).unwrap();
    let pool = MaxPoolLayer::new("pool", Shape::new(6, 6, 3), MaxPoolConfig { size: 2, stride: 2 }).unwrap();
    model.add(Layer::MaxPool(pool)).unwrap();
    model.add(Layer::Dense(DenseLayer::new("fc", 4).unwrap())).unwrap();
    model.add(Layer::Softmax(SoftmaxLayer::new("softmax", 4).unwrap())).unwrap();
    model
}

fn create_inputs() -> Tensor {
    Tensor::random(INPUT_SHAPE, &mut StdRng::seed_from_u64(5)).unwrap()
}

fn target() -> Tensor {
    Tensor::column(vec![0.0, 0.0, 1.0, 0.0])
}

#[test]
fn test_predict_is_a_distribution() {
    let mut model = create_model();
    let output = model.predict(create_inputs()).unwrap();
    assert_eq!(output.shape(), Shape::column(4));
    assert!((output.sum() - 1.0).abs() < 1e-9);
    assert!(output.iter().all(|o| *o > 0.0));
    assert_eq!(model.layers()[3].input().shape(), Shape::new(3, 3, 3));
}

#[test]
fn test_fit_updates_parametrized_layers() {
    let mut model = create_model();
    model.predict(create_inputs()).unwrap();
    let before: Vec<_> = model.layers().iter().map(|o| o.serialize().unwrap()).collect();

    let result = model.fit(create_inputs(), &target(), &TrainConfig::new(0.01)).unwrap();
    assert!(result.loss > 0.0);

    for (layer, before) in model.layers().iter().zip(before) {
        let after = layer.serialize().unwrap();
        match layer.kind() {
            LayerKind::Conv | LayerKind::Fc => assert_ne!(after, before, "{} didn't change", layer.name()),
            _ => assert_eq!(after, before, "{} changed", layer.name()),
        }
        assert_eq!(layer.grad_input().len(), layer.input().len(), "{}", layer.name());
    }
}

#[test]
fn test_training_reduces_loss() {
    let mut model = create_model();
    let config = TrainConfig::new(0.01);
    let first = model.evaluate(create_inputs(), &target()).unwrap();
    for _ in 0..50 {
        model.fit(create_inputs(), &target(), &config).unwrap();
    }
    let last = model.evaluate(create_inputs(), &target()).unwrap();
    assert!(last.loss < first.loss, "{} >= {}", last.loss, first.loss);
    assert!(last.correct);
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let mut model = create_model();
    model.fit(create_inputs(), &target(), &TrainConfig::new(0.01)).unwrap();
    model.save(&path).unwrap();

    let mut loaded = Model::load(&path).unwrap();
    assert_eq!(loaded.len(), model.len());
    for (a, b) in loaded.layers().iter().zip(model.layers()) {
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.name(), b.name());
        assert_eq!(a.serialize().unwrap(), b.serialize().unwrap());
    }

    let expected = model.predict(create_inputs()).unwrap();
    let actual = loaded.predict(create_inputs()).unwrap();
    assert!(expected.iter().zip(actual.iter()).all(|(a, b)| (a - b).abs() < 1e-12));
}

#[test]
fn test_save_before_dense_init() {
    let dir = tempfile::tempdir().unwrap();
    let result = create_model().save(dir.path().join("model.json"));
    assert!(matches!(result, Err(ConvNetError::NotInitialized(_))));
}

#[test]
fn test_load_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    fs::write(&path, "{\"layer_0\": {\"type\": \"pool\", \"name\": \"p\"}}").unwrap();
    assert!(matches!(Model::load(&path), Err(ConvNetError::MalformedModel(_))));

    fs::write(&path, "not json").unwrap();
    assert!(matches!(Model::load(&path), Err(ConvNetError::MalformedModel(_))));

    assert!(matches!(Model::load(dir.path().join("missing.json")), Err(ConvNetError::Io(_))));
}

#[test]
fn test_architecture_to_document() {
    let architecture = r#"
<ConvNet height="6" width="6" depth="2">
    <Conv name="conv" filters="3" size="3" stride="1" padding="1"/>
    <ReLU name="relu"/>
    <MaxPool name="pool" size="2" stride="2"/>
    <FC name="fc" hidden="4"/>
    <Softmax name="softmax"/>
</ConvNet>
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let model = load_model_xml(architecture.as_bytes(), Some(9)).unwrap();
    model.save(&path).unwrap();

    let document: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let types: Vec<_> = (0..5).map(|i| document[format!("layer_{}", i)]["type"].clone()).collect();
    assert_eq!(types, vec!["conv", "relu", "pool", "fc", "softmax"]);
    assert_eq!(document["layer_3"]["input"], 27);

    let mut loaded = Model::load(&path).unwrap();
    assert_eq!(loaded.output_shape(), Some(Shape::column(4)));
    assert!(loaded.predict(create_inputs()).is_ok());
}
