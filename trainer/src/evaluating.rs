use std::fmt::{Display, Formatter};
use std::path::Path;
use anyhow::{Context, Result};
use convnet::integration::dataset_loading::{Dataset, Sample};
use convnet::integration::image_loading::load_image;
use convnet::nn::model::Metrics;
use convnet::{Model, Tensor, F};
use itertools::Itertools;
use log::{debug, info};

/// Results of a model over a set of samples, overall and for each class
#[derive(Clone, Debug, Default)]
pub struct EvaluationReport {
    pub overall: Metrics,
    pub per_class: Vec<Metrics>,
}

pub struct ReportDisplay<'a> {
    report: &'a EvaluationReport,
    classes: &'a [String],
}

impl EvaluationReport {
    pub fn display<'a>(&'a self, classes: &'a [String]) -> ReportDisplay<'a> {
        ReportDisplay { report: self, classes }
    }
}

impl<'a> Display for ReportDisplay<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let overall = &self.report.overall;
        writeln!(
            f,
            "{} images: accuracy={:.2}% loss={:.4}",
            overall.count,
            overall.accuracy() * 100.0,
            overall.average_loss()
        )?;
        let lines = self.report.per_class.iter().enumerate().map(|(i, metrics)| {
            format!(
                "    {}: {:.2}% of {}",
                class_name(self.classes, i),
                metrics.accuracy() * 100.0,
                metrics.count
            )
        });
        write!(f, "{}", lines.format("\n"))
    }
}

fn class_name(classes: &[String], index: usize) -> String {
    classes.get(index).cloned().unwrap_or_else(|| index.to_string())
}

/// Run every sample through the model without training it
pub fn evaluate(model: &mut Model, dataset: &Dataset, samples: &[Sample]) -> Result<EvaluationReport> {
    let mut report = EvaluationReport {
        overall: Metrics::default(),
        per_class: vec![Metrics::default(); dataset.class_count()],
    };

    for (i, sample) in samples.iter().enumerate() {
        let (inputs, target) = dataset
            .load(sample)
            .with_context(|| format!("Couldn't load {}", sample.path.display()))?;
        let result = model.evaluate(inputs, &target)?;

        report.overall.record(&result);
        if let Some(metrics) = report.per_class.get_mut(sample.label) {
            metrics.record(&result);
        }
        if (i + 1) % 1000 == 0 {
            debug!("Evaluated {}/{}", i + 1, samples.len());
        }
    }
    Ok(report)
}

/// Most likely class of an image and the probability of every class
#[derive(Clone, Debug)]
pub struct Prediction {
    pub class: usize,
    pub probabilities: Vec<F>,
}

pub struct PredictionDisplay<'a> {
    prediction: &'a Prediction,
    classes: &'a [String],
}

impl Prediction {
    pub fn display<'a>(&'a self, classes: &'a [String]) -> PredictionDisplay<'a> {
        PredictionDisplay { prediction: self, classes }
    }
}

impl<'a> Display for PredictionDisplay<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let probabilities = self
            .prediction
            .probabilities
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}={:.4}", class_name(self.classes, i), p))
            .join(", ");
        write!(
            f,
            "Predicted {} [{}]",
            class_name(self.classes, self.prediction.class),
            probabilities
        )
    }
}

pub fn classify(model: &mut Model, image: &Path) -> Result<Prediction> {
    let inputs = load_image(image).with_context(|| format!("Couldn't load {}", image.display()))?;
    let output = model.predict(inputs)?;
    Ok(prediction_of(&output))
}

fn prediction_of(output: &Tensor) -> Prediction {
    let prediction = Prediction {
        class: output.argmax().unwrap_or(0),
        probabilities: output.to_vec(),
    };
    info!("Predicted class {}", prediction.class);
    prediction
}
