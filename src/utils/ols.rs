//! Ordinary least squares on a dense design matrix.
//!
//! Used by the unit-root regression, where standard errors of individual
//! coefficients are needed.

use crate::error::{AnalysisError, Result};

/// Fitted OLS regression.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Coefficients, one per design column.
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub n: usize,
}

impl OLSResult {
    /// t statistic of coefficient `i`.
    pub fn t_statistic(&self, i: usize) -> Option<f64> {
        let se = *self.std_errors.get(i)?;
        if se > 0.0 && se.is_finite() {
            Some(self.coefficients[i] / se)
        } else {
            None
        }
    }
}

/// Fit `y = X beta + e` where `rows[t]` is the t-th row of `X`.
///
/// The design must include its own intercept column if one is wanted.
pub fn ols_fit(y: &[f64], rows: &[Vec<f64>]) -> Result<OLSResult> {
    let n = y.len();
    if rows.len() != n {
        return Err(AnalysisError::DimensionMismatch {
            expected: n,
            got: rows.len(),
        });
    }
    let k = rows.first().map(Vec::len).unwrap_or(0);
    if k == 0 {
        return Err(AnalysisError::Configuration(
            "design matrix has no columns".to_string(),
        ));
    }
    if n <= k {
        return Err(AnalysisError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &y_t) in rows.iter().zip(y) {
        if row.len() != k {
            return Err(AnalysisError::DimensionMismatch {
                expected: k,
                got: row.len(),
            });
        }
        for i in 0..k {
            xty[i] += row[i] * y_t;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
    }

    let singular = || AnalysisError::Configuration("singular design matrix".to_string());
    let l = cholesky(&xtx).ok_or_else(singular)?;
    let coefficients = cholesky_solve(&l, &xty);

    let rss: f64 = rows
        .iter()
        .zip(y)
        .map(|(row, &y_t)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
            (y_t - fitted).powi(2)
        })
        .sum();
    let sigma_sq = rss / (n - k) as f64;

    // diag((X'X)^-1) column by column
    let std_errors = (0..k)
        .map(|i| {
            let mut e = vec![0.0; k];
            e[i] = 1.0;
            let col = cholesky_solve(&l, &e);
            (sigma_sq * col[i]).max(0.0).sqrt()
        })
        .collect();

    Ok(OLSResult {
        coefficients,
        std_errors,
        rss,
        n,
    })
}

/// Lower-triangular Cholesky factor of a symmetric positive definite matrix.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 1e-9 * a[i][i].abs().max(1e-300) {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }
    Some(l)
}

/// Solve `L L' x = b`.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }
    x
}
