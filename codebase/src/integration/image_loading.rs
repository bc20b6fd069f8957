use std::path::Path;
use image::io::Reader as ImageReader;
use image::DynamicImage;
use crate::nn::tensor::{Shape, Tensor};
use crate::utils::GenericResult;

/// Decode the image at **path** into a (height, width, 3) tensor with values in [0, 1].
/// Channel 0 is red.
pub fn load_image(path: impl AsRef<Path>) -> GenericResult<Tensor> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    image_to_tensor(&image)
}

pub fn image_to_tensor(image: &DynamicImage) -> GenericResult<Tensor> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let shape = Shape::new(height as usize, width as usize, 3);
    Tensor::from_interleaved_bytes(shape, rgb.as_raw())
}
