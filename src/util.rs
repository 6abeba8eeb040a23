use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};

#[inline]
pub(crate) fn squared_euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Zeroed `rows × cols` matrix whose buffer is reserved fallibly.
///
/// The similarity and normalized matrices are O(n²); an allocation failure
/// surfaces as [`Error::Allocation`] instead of aborting the process.
pub(crate) fn try_zeros(rows: usize, cols: usize) -> Result<Array2<f64>> {
    let elements = rows
        .checked_mul(cols)
        .ok_or(Error::Allocation { elements: usize::MAX })?;

    let mut buf: Vec<f64> = Vec::new();
    buf.try_reserve_exact(elements)
        .map_err(|_| Error::Allocation { elements })?;
    buf.resize(elements, 0.0);

    Array2::from_shape_vec((rows, cols), buf).map_err(|e| Error::ShapeMismatch {
        expected: format!("{rows}x{cols}"),
        actual: e.to_string(),
    })
}

/// Frobenius norm of `a - b`.
pub(crate) fn frobenius_distance(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    debug_assert_eq!(a.dim(), b.dim());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}
