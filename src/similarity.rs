//! Similarity graph construction for SymNMF.
//!
//! Three pure functions over a [`PointSet`]:
//!
//! ```text
//! W[i][j] = exp(-||p_i - p_j||² / 2)    i != j,   W[i][i] = 0
//! D[i]    = Σ_j W[i][j]
//! A       = D^{-1/2} W D^{-1/2}          A[i][j] = W[i][j] / sqrt(D[i] D[j])
//! ```
//!
//! `W` is the Gaussian (RBF) affinity with σ = 1. The diagonal is forced to
//! zero: self-similarity is excluded, not approximated. `D` is only needed on
//! its diagonal and is returned as a vector; [`degree_matrix`] materializes
//! the full `n × n` form when it has to be printed.
//!
//! # Memory
//!
//! `W` and `A` are both `n × n`. [`normalize`] rescales `W` in place, so only
//! one of them is resident at a time. Buffers are reserved fallibly and an
//! allocation failure is reported as [`Error::Allocation`].
//!
//! # Degenerate input
//!
//! When every off-diagonal similarity of a point underflows to zero (a point
//! roughly 38+ units from all others), its degree is 0 and `D^{-1/2}` is
//! undefined. [`normalize`] fails with [`Error::ZeroDegree`] rather than
//! producing NaN or infinity.

use crate::error::{Error, Result};
use crate::points::PointSet;
use crate::util::{squared_euclidean, try_zeros};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::debug;

#[cfg(feature = "parallel")]
use ndarray::Axis;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[inline]
fn gaussian(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    (-squared_euclidean(a, b) / 2.0).exp()
}

/// Pairwise Gaussian affinity matrix `W`.
///
/// Symmetric with an exactly zero diagonal. O(n²·dim) time, O(n²) space.
pub fn similarity(points: &PointSet) -> Result<Array2<f64>> {
    let n = points.len();
    let mut w = try_zeros(n, n)?;

    // Each entry is computed from the same operands in the same order whichever
    // triangle it lands in, so the row-parallel path is still exactly symmetric.
    #[cfg(feature = "parallel")]
    {
        let data = points.view();
        w.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, mut row)| {
                for j in 0..n {
                    if j == i {
                        continue;
                    }
                    let (a, b) = if i < j { (i, j) } else { (j, i) };
                    row[j] = gaussian(data.row(a), data.row(b));
                }
            });
    }

    #[cfg(not(feature = "parallel"))]
    for i in 0..n {
        for j in (i + 1)..n {
            let entry = gaussian(points.point(i), points.point(j));
            w[[i, j]] = entry;
            w[[j, i]] = entry;
        }
    }

    debug!(n, dim = points.dim(), "built similarity matrix");
    Ok(w)
}

/// Degree vector `D` (row sums of the similarity matrix) for a point set.
pub fn degree(points: &PointSet) -> Result<Array1<f64>> {
    let w = similarity(points)?;
    degree_from(w.view())
}

/// Degree vector from an already computed similarity matrix.
pub fn degree_from(w: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
    check_square(w, "similarity")?;
    Ok(w.rows().into_iter().map(|row| row.sum()).collect())
}

/// The diagonal degree matrix as a full `n × n` array.
pub fn degree_matrix(d: &Array1<f64>) -> Array2<f64> {
    Array2::from_diag(d)
}

/// Normalized similarity `A = D^{-1/2} W D^{-1/2}` for a point set.
///
/// Fails with [`Error::ZeroDegree`] if any point has zero total similarity.
pub fn normalize(points: &PointSet) -> Result<Array2<f64>> {
    let mut w = similarity(points)?;
    let d = degree_from(w.view())?;
    let sqrt_d = sqrt_degrees(&d)?;
    scale_symmetric(&mut w, &sqrt_d)?;
    debug!(n = points.len(), "normalized similarity matrix");
    Ok(w)
}

/// Normalized similarity from a precomputed `W` and its degree vector.
pub fn normalize_from(w: ArrayView2<'_, f64>, d: &Array1<f64>) -> Result<Array2<f64>> {
    check_square(w, "similarity")?;
    if d.len() != w.nrows() {
        return Err(Error::DimensionMismatch {
            expected: w.nrows(),
            found: d.len(),
        });
    }
    let sqrt_d = sqrt_degrees(d)?;
    let mut a = try_zeros(w.nrows(), w.ncols())?;
    a.assign(&w);
    scale_symmetric(&mut a, &sqrt_d)?;
    Ok(a)
}

fn sqrt_degrees(d: &Array1<f64>) -> Result<Array1<f64>> {
    d.iter()
        .enumerate()
        .map(|(index, &v)| {
            if !v.is_finite() {
                return Err(Error::NonFinite {
                    row: index,
                    col: index,
                });
            }
            if v <= 0.0 {
                return Err(Error::ZeroDegree { index });
            }
            Ok(v.sqrt())
        })
        .collect()
}

/// `m[i][j] / sqrt_d[i] / sqrt_d[j]`, divided one factor at a time.
///
/// A subnormal degree has a tiny but representable root; multiplying two
/// reciprocal roots first would overflow to infinity.
fn scale_symmetric(m: &mut Array2<f64>, sqrt_d: &Array1<f64>) -> Result<()> {
    for ((i, j), v) in m.indexed_iter_mut() {
        *v = *v / sqrt_d[i] / sqrt_d[j];
        if !v.is_finite() {
            return Err(Error::NonFinite { row: i, col: j });
        }
    }
    Ok(())
}

fn check_square(m: ArrayView2<'_, f64>, what: &str) -> Result<()> {
    if m.nrows() != m.ncols() {
        return Err(Error::ShapeMismatch {
            expected: format!("square {what} matrix"),
            actual: format!("{}x{}", m.nrows(), m.ncols()),
        });
    }
    Ok(())
}
