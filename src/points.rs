//! Validated point sets.
//!
//! Every algorithm in this crate consumes a [`PointSet`]: `n >= 2` points of
//! identical dimension, stored row-major in a contiguous `n × dim` array so
//! point `i` is row `i`. Indices are stable and are what labels align to.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// An immutable, uniformly-dimensioned collection of points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    data: Array2<f64>,
}

impl PointSet {
    /// Build a point set from rows, checking that every row has the
    /// dimension of the first and that there are at least two points.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = rows.len();
        let d = rows[0].len();
        if d == 0 {
            return Err(Error::InvalidParameter {
                name: "points",
                message: "points must have at least one coordinate",
            });
        }

        let mut flat: Vec<f64> = Vec::with_capacity(n * d);
        for row in rows {
            if row.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: row.len(),
                });
            }
            flat.extend(row);
        }

        let data = Array2::from_shape_vec((n, d), flat).map_err(|e| Error::ShapeMismatch {
            expected: format!("{n}x{d}"),
            actual: e.to_string(),
        })?;
        Self::from_array(data)
    }

    /// Wrap an existing `n × dim` array.
    pub fn from_array(data: Array2<f64>) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(Error::EmptyInput);
        }
        if data.nrows() < 2 {
            return Err(Error::InvalidParameter {
                name: "points",
                message: "at least two points are required",
            });
        }
        if data.ncols() == 0 {
            return Err(Error::InvalidParameter {
                name: "points",
                message: "points must have at least one coordinate",
            });
        }
        if let Some(((row, col), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::NonFinite { row, col });
        }
        Ok(Self {
            data: data.as_standard_layout().into_owned(),
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Always false; a point set holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Coordinates per point.
    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    /// Point `i`.
    pub fn point(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    /// The whole set as an `n × dim` view.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Iterate over points in index order.
    pub fn iter(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.data.rows().into_iter()
    }

    /// Points as owned rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter().map(|p| p.to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for PointSet {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl TryFrom<&[Vec<f64>]> for PointSet {
    type Error = Error;

    fn try_from(rows: &[Vec<f64>]) -> Result<Self> {
        Self::new(rows.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_set_basic() {
        let points = PointSet::new(vec![vec![0.0, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]]).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points.dim(), 2);
        assert_eq!(points.point(1).to_vec(), vec![2.0, 3.0]);
        assert_eq!(points.to_rows()[2], vec![4.0, 5.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = PointSet::new(vec![vec![0.0, 1.0], vec![2.0]]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_single_point_rejected() {
        assert!(PointSet::new(vec![vec![1.0]]).is_err());
        assert!(matches!(PointSet::new(vec![]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_try_from_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let borrowed = PointSet::try_from(rows.as_slice()).unwrap();
        let owned = PointSet::try_from(rows.clone()).unwrap();
        assert_eq!(borrowed, owned);
        assert_eq!(borrowed.to_rows(), rows);

        let ragged = vec![vec![1.0], vec![2.0, 3.0]];
        assert!(PointSet::try_from(ragged.as_slice()).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = PointSet::new(vec![vec![0.0], vec![f64::NAN]]).unwrap_err();
        assert!(matches!(err, Error::NonFinite { row: 1, col: 0 }));
    }
}
