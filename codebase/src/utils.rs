use crate::error::ConvNetError;
use ndarray::{Array, Array1, Array2, Array3, Dimension};

pub type F = f64;
pub type ArrayF<D> = Array<F, D>;
pub type Array1F = Array1<F>;
pub type Array2F = Array2<F>;
pub type Array3F = Array3<F>;

pub type GenericResult<T> = Result<T, ConvNetError>;

pub fn arrays_almost_equal<D: Dimension>(arr1: &ArrayF<D>, arr2: &ArrayF<D>) -> bool {
    arr1.shape() == arr2.shape() && arr1.iter().zip(arr2.iter()).all(|(a, b)| (a - b).abs() < 0.001)
}

/// Length of one spatial dimension after sliding a window of **size** over it with the given
/// **stride** and symmetric zero **padding**. Returns None when the window doesn't fit or the
/// padded length overflows.
pub fn get_dims_after_filter(length: usize, size: usize, stride: usize, padding: usize) -> Option<usize> {
    if stride == 0 {
        return None;
    }
    padding
        .checked_mul(2)
        .and_then(|o| o.checked_add(length))
        .and_then(|o| o.checked_sub(size))
        .map(|o| o / stride + 1)
}

/// Index of the first highest value
pub fn argmax<'a>(values: impl IntoIterator<Item = &'a F>) -> Option<usize> {
    values
        .into_iter()
        .enumerate()
        .reduce(|acc, val| if val.1 > acc.1 { val } else { acc })
        .map(|o| o.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_dims_after_filter() {
        assert_eq!(get_dims_after_filter(3, 1, 1, 0), Some(3));
        assert_eq!(get_dims_after_filter(4, 3, 1, 0), Some(2));
        assert_eq!(get_dims_after_filter(4, 2, 1, 0), Some(3));
        assert_eq!(get_dims_after_filter(6, 2, 3, 0), Some(2));
        assert_eq!(get_dims_after_filter(5, 2, 2, 0), Some(2));
        assert_eq!(get_dims_after_filter(4, 3, 1, 1), Some(4));
        assert_eq!(get_dims_after_filter(2, 3, 1, 0), None);
        assert_eq!(get_dims_after_filter(4, 2, 0, 0), None);
        assert_eq!(get_dims_after_filter(4, 3, 1, usize::MAX), None);
        assert_eq!(get_dims_after_filter(usize::MAX, 1, 1, 1), None);
    }

    #[test]
    fn test_argmax_first_of_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[-1.0]), Some(0));
        assert_eq!(argmax(&Vec::<F>::new()), None);
    }
}
