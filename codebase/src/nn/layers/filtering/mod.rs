use ndarray::s;
use crate::utils::Array3F;

pub mod convolution;
pub mod max_pool;

/// Surround every channel with **padding** rows and columns of zeros
pub fn pad3d(array: &Array3F, padding: usize) -> Array3F {
    if padding == 0 {
        return array.clone();
    }

    let (depth, height, width) = array.dim();
    let mut result = Array3F::zeros((depth, height + 2 * padding, width + 2 * padding));
    let mut slice = result.slice_mut(s![
        ..,
        padding..height + padding,
        padding..width + padding
    ]);
    slice.assign(array);
    result
}

/// Inverse of [pad3d]: strip the outer **padding** rows and columns of every channel
pub fn remove_padding_3d(array: Array3F, padding: usize) -> Array3F {
    let (_, height, width) = array.dim();
    let height = height - padding;
    let width = width - padding;
    array.slice_move(s![.., padding..height, padding..width])
}
