use std::fs;
use std::path::{Path, PathBuf};
use log::debug;
use ndarray_rand::rand::seq::SliceRandom;
use ndarray_rand::rand::RngCore;
use crate::error::ConvNetError;
use crate::integration::image_loading::load_image;
use crate::nn::tensor::Tensor;
use crate::utils::GenericResult;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// An image and the index of its class
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    pub path: PathBuf,
    pub label: usize,
}

/// Labeled images stored as one directory per class. Classes are sorted by directory name.
#[derive(Clone, Debug)]
pub struct Dataset {
    classes: Vec<String>,
    /// Sorted image paths of every class
    files: Vec<Vec<PathBuf>>,
}

impl Dataset {
    pub fn open(root: impl AsRef<Path>) -> GenericResult<Self> {
        let root = root.as_ref();
        let mut class_dirs = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                class_dirs.push(entry.path());
            }
        }
        class_dirs.sort();

        if class_dirs.is_empty() {
            return Err(ConvNetError::InvalidConfig(format!("{} doesn't contain any class directory", root.display())));
        }

        let mut classes = Vec::with_capacity(class_dirs.len());
        let mut files = Vec::with_capacity(class_dirs.len());
        for dir in class_dirs {
            let mut images = Vec::new();
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_file() && is_image(&path) {
                    images.push(path);
                }
            }
            images.sort();

            let name = dir
                .file_name()
                .map(|o| o.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("Class {} '{}' has {} images", classes.len(), name, images.len());
            classes.push(name);
            files.push(images);
        }

        Ok(Self { classes, files })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// First **train_size** images of every class for training, the next **valid_size** for
    /// validation
    pub fn split(&self, train_size: usize, valid_size: usize) -> (Vec<Sample>, Vec<Sample>) {
        let train = self.collect(|images| images.iter().take(train_size));
        let valid = self.collect(|images| images.iter().skip(train_size).take(valid_size));
        (train, valid)
    }

    /// Every image, class by class
    pub fn all(&self) -> Vec<Sample> {
        self.collect(|images| images.iter())
    }

    /// Image tensor and one-hot target of **sample**
    pub fn load(&self, sample: &Sample) -> GenericResult<(Tensor, Tensor)> {
        let inputs = load_image(&sample.path)?;
        Ok((inputs, one_hot(sample.label, self.class_count())))
    }

    fn collect<'a, I>(&'a self, select: impl Fn(&'a [PathBuf]) -> I) -> Vec<Sample>
    where
        I: Iterator<Item = &'a PathBuf>,
    {
        self.files
            .iter()
            .enumerate()
            .flat_map(|(label, images)| {
                select(images.as_slice()).map(move |path| Sample { path: path.clone(), label })
            })
            .collect()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|o| o.to_string_lossy().to_ascii_lowercase())
        .map_or(false, |o| IMAGE_EXTENSIONS.contains(&o.as_str()))
}

/// Column of **classes** zeros with a 1 at **label**
pub fn one_hot(label: usize, classes: usize) -> Tensor {
    let mut values = vec![0.0; classes];
    if let Some(value) = values.get_mut(label) {
        *value = 1.0;
    }
    Tensor::column(values)
}

pub fn shuffle(samples: &mut [Sample], rng: &mut dyn RngCore) {
    samples.shuffle(rng);
}
