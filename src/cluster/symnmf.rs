//! Symmetric Non-negative Matrix Factorization (SymNMF) clustering.
//!
//! Given the normalized similarity matrix `A` (see [`crate::similarity`]),
//! SymNMF looks for a non-negative `n × k` factor `H` with
//!
//! ```text
//! min_{H ≥ 0} ||A - H Hᵀ||²_F
//! ```
//!
//! Row `i` of `H` is a soft membership of point `i` over the k clusters; the
//! hard label is the row-wise argmax ([`labels_from_h`]).
//!
//! # Multiplicative Update
//!
//! Every entry is updated from the previous iterate only (the whole matrix at
//! once, never element by element in place):
//!
//! ```text
//! ratio   = (A H)ᵢⱼ / ((H Hᵀ H)ᵢⱼ + δ)
//! Hᵢⱼ    ← Hᵢⱼ · ((1 - β) + β · ratio)
//! ```
//!
//! With β = 1 this is the plain multiplicative rule. β < 1 damps each step;
//! β = ½ is the classic damped SymNMF update. δ only guards against a zero
//! denominator. Since `A ≥ 0`, `H₀ ≥ 0` and `0 < β ≤ 1`, every factor is
//! non-negative and `H` stays non-negative at every iteration.
//!
//! `H Hᵀ H` is evaluated as `H (Hᵀ H)`: an `n × k` times `k × k` product
//! instead of materializing the `n × n` matrix `H Hᵀ`.
//!
//! # Initialization
//!
//! `H₀` is drawn element-wise (row-major) from `Uniform[0, 2·sqrt(mean(A)/k)]`,
//! which puts `||H₀ H₀ᵀ||` in the same range as `||A||`. The random source is
//! always explicit: a seed on the builder or a caller-supplied generator.
//!
//! # Stopping
//!
//! Stops when `||H_{t+1} - H_t||_F ≤ ε` or after `max_iter` updates. Hitting
//! the cap is not an error; [`SymNmfFit::converged`] reports which happened.
//!
//! # References
//!
//! - Kuang, Ding, Park (2012). "Symmetric Nonnegative Matrix Factorization for Graph Clustering"

use super::labels::labels_from_h;
use super::traits::{Clustering, SoftClustering};
use crate::error::{Error, Result};
use crate::points::PointSet;
use crate::similarity::normalize;
use crate::util::frobenius_distance;
use ndarray::{Array2, ArrayView2, Zip};
use rand::distr::Uniform;
use rand::prelude::*;
use tracing::{debug, trace};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 1234;

/// Default denominator guard δ.
pub const DEFAULT_STABILITY: f64 = 1e-9;

/// SymNMF clustering configuration and runner.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymNmf {
    /// Number of clusters (columns of H).
    k: usize,
    /// Maximum update iterations.
    max_iter: usize,
    /// Convergence threshold on the Frobenius change of H.
    epsilon: f64,
    /// Damping of the multiplicative step, in (0, 1].
    beta: f64,
    /// Denominator guard.
    stability: f64,
    /// Seed for the initial factor.
    seed: u64,
}

/// Result of a SymNMF run.
#[derive(Debug, Clone, PartialEq)]
pub struct SymNmfFit {
    /// Final `n × k` factor, entry-wise non-negative.
    pub h: Array2<f64>,
    /// Update iterations performed.
    pub iterations: usize,
    /// Whether the last update moved H by at most ε.
    pub converged: bool,
}

impl SymNmfFit {
    /// Hard labels (row-wise argmax of H).
    pub fn labels(&self) -> Vec<usize> {
        labels_from_h(&self.h)
    }
}

impl SymNmf {
    /// Create a SymNMF runner for k clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: super::kmeans::DEFAULT_MAX_ITER,
            epsilon: super::kmeans::DEFAULT_EPSILON,
            beta: 1.0,
            stability: DEFAULT_STABILITY,
            seed: DEFAULT_SEED,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set update damping β.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the denominator guard δ.
    pub fn with_stability(mut self, stability: f64) -> Self {
        self.stability = stability;
        self
    }

    /// Set random seed for the initial factor.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate_params(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be finite and positive",
            });
        }
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "beta",
                message: "must be in (0, 1]",
            });
        }
        if !(self.stability.is_finite() && self.stability > 0.0) {
            return Err(Error::InvalidParameter {
                name: "stability",
                message: "must be finite and positive",
            });
        }
        Ok(())
    }

    fn validate_affinity(&self, a: ArrayView2<'_, f64>) -> Result<()> {
        let n = a.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if a.ncols() != n {
            return Err(Error::ShapeMismatch {
                expected: format!("{n}x{n}"),
                actual: format!("{}x{}", n, a.ncols()),
            });
        }
        if self.k <= 1 || self.k >= n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        check_non_negative(a)
    }

    /// Run the whole pipeline: normalized similarity, then decomposition.
    pub fn fit(&self, points: &PointSet) -> Result<SymNmfFit> {
        if self.k <= 1 || self.k >= points.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: points.len(),
            });
        }
        self.validate_params()?;
        let a = normalize(points)?;
        self.fit_normalized(&a)
    }

    /// Factorize a normalized similarity matrix, seeding H₀ from the configured seed.
    pub fn fit_normalized(&self, a: &Array2<f64>) -> Result<SymNmfFit> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.fit_normalized_with_rng(a, &mut rng)
    }

    /// Factorize a normalized similarity matrix, drawing H₀ from `rng`.
    pub fn fit_normalized_with_rng<R: Rng + ?Sized>(
        &self,
        a: &Array2<f64>,
        rng: &mut R,
    ) -> Result<SymNmfFit> {
        self.validate_params()?;
        self.validate_affinity(a.view())?;
        let h0 = initial_factor(a, self.k, rng)?;
        self.iterate(a.view(), h0)
    }

    /// Factorize starting from an explicit initial factor `H₀` (`n × k`, non-negative).
    pub fn decompose_from(&self, a: &Array2<f64>, h0: Array2<f64>) -> Result<SymNmfFit> {
        self.validate_params()?;
        self.validate_affinity(a.view())?;
        if h0.dim() != (a.nrows(), self.k) {
            return Err(Error::ShapeMismatch {
                expected: format!("{}x{}", a.nrows(), self.k),
                actual: format!("{}x{}", h0.nrows(), h0.ncols()),
            });
        }
        check_non_negative(h0.view())?;
        self.iterate(a.view(), h0)
    }

    /// One multiplicative update of `h` against `a`.
    ///
    /// Reads only `h`; the result is a fresh matrix.
    pub fn step(&self, a: ArrayView2<'_, f64>, h: &Array2<f64>) -> Array2<f64> {
        let ah = a.dot(h);
        let gram = h.t().dot(h);
        let hhth = h.dot(&gram);

        let (beta, stability) = (self.beta, self.stability);
        let mut next = h.clone();
        Zip::from(&mut next)
            .and(&ah)
            .and(&hhth)
            .for_each(|v, &num, &den| {
                let ratio = num / (den + stability);
                *v *= (1.0 - beta) + beta * ratio;
            });
        next
    }

    fn iterate(&self, a: ArrayView2<'_, f64>, mut h: Array2<f64>) -> Result<SymNmfFit> {
        debug!(
            n = a.nrows(),
            k = self.k,
            max_iter = self.max_iter,
            beta = self.beta,
            "symnmf start"
        );

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;
            let next = self.step(a, &h);
            let delta = frobenius_distance(&next, &h);
            h = next;
            trace!(iteration = iterations, delta, "symnmf update");

            if delta <= self.epsilon {
                converged = true;
                break;
            }
        }

        if let Some(((row, col), _)) = h.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::NonFinite { row, col });
        }

        if converged {
            debug!(iterations, "symnmf converged");
        } else {
            debug!(iterations, "symnmf reached iteration cap without converging");
        }

        Ok(SymNmfFit {
            h,
            iterations,
            converged,
        })
    }
}

/// Draw the initial factor `H₀ ~ Uniform[0, 2·sqrt(mean(A)/k)]`, row-major.
pub fn initial_factor<R: Rng + ?Sized>(
    a: &Array2<f64>,
    k: usize,
    rng: &mut R,
) -> Result<Array2<f64>> {
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "must be positive",
        });
    }
    let mean = a.mean().ok_or(Error::EmptyInput)?;
    if !(mean.is_finite() && mean >= 0.0) {
        return Err(Error::InvalidParameter {
            name: "a",
            message: "mean must be finite and non-negative",
        });
    }

    let scale = 2.0 * (mean / k as f64).sqrt();
    let dist = Uniform::new_inclusive(0.0, scale).map_err(|_| Error::InvalidParameter {
        name: "a",
        message: "cannot build initialization range",
    })?;

    Ok(Array2::from_shape_simple_fn((a.nrows(), k), || {
        rng.sample(&dist)
    }))
}

/// Factorize `a` into an `n × k` non-negative factor with default damping,
/// guard and seed.
pub fn decompose(a: &Array2<f64>, k: usize, max_iter: usize, epsilon: f64) -> Result<Array2<f64>> {
    SymNmf::new(k)
        .with_max_iter(max_iter)
        .with_epsilon(epsilon)
        .fit_normalized(a)
        .map(|fit| fit.h)
}

fn check_non_negative(m: ArrayView2<'_, f64>) -> Result<()> {
    for ((row, col), &value) in m.indexed_iter() {
        if !value.is_finite() {
            return Err(Error::NonFinite { row, col });
        }
        if value < 0.0 {
            return Err(Error::NegativeEntry { row, col, value });
        }
    }
    Ok(())
}

impl Clustering for SymNmf {
    fn fit_predict(&self, points: &PointSet) -> Result<Vec<usize>> {
        Ok(self.fit(points)?.labels())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

impl SoftClustering for SymNmf {
    fn fit_predict_proba(&self, points: &PointSet) -> Result<Vec<Vec<f64>>> {
        let fit = self.fit(points)?;
        Ok(fit.h.rows().into_iter().map(|r| r.to_vec()).collect())
    }
}
