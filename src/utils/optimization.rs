//! Derivative-free minimization for model parameter estimation.
//!
//! A bounded Nelder-Mead simplex. ARIMA uses it to minimize the
//! conditional sum of squares over intercept, AR and MA coefficients.

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best vertex found.
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether a stopping criterion was met before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Iteration budget.
    pub max_iter: usize,
    /// Relative tolerance on the spread of objective values across the
    /// simplex, also used as an absolute bound on the simplex size.
    pub tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step, relative to each nonzero coordinate.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Vertices kept sorted by objective value, best first.
struct Simplex<'a, F> {
    objective: F,
    bounds: Option<&'a [(f64, f64)]>,
    vertices: Vec<(Vec<f64>, f64)>,
}

impl<'a, F: Fn(&[f64]) -> f64> Simplex<'a, F> {
    fn new(objective: F, initial: &[f64], bounds: Option<&'a [(f64, f64)]>, step: f64) -> Self {
        let mut simplex = Self {
            objective,
            bounds,
            vertices: Vec::with_capacity(initial.len() + 1),
        };
        let start = simplex.clamp(initial.to_vec());
        simplex.push(start);
        for i in 0..initial.len() {
            let mut vertex = initial.to_vec();
            vertex[i] += if initial[i].abs() > 1e-10 {
                step * initial[i].abs()
            } else {
                step
            };
            let vertex = simplex.clamp(vertex);
            simplex.push(vertex);
        }
        simplex.sort();
        simplex
    }

    /// Objective with non-finite values mapped to `+inf`.
    fn eval(&self, x: &[f64]) -> f64 {
        let value = (self.objective)(x);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    }

    fn clamp(&self, mut x: Vec<f64>) -> Vec<f64> {
        if let Some(bounds) = self.bounds {
            for (xi, &(lo, hi)) in x.iter_mut().zip(bounds) {
                *xi = xi.clamp(lo, hi);
            }
        }
        x
    }

    fn push(&mut self, x: Vec<f64>) {
        let value = self.eval(&x);
        self.vertices.push((x, value));
    }

    fn sort(&mut self) {
        self.vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
    }

    fn best(&self) -> f64 {
        self.vertices[0].1
    }

    fn worst(&self) -> f64 {
        self.vertices[self.vertices.len() - 1].1
    }

    fn second_worst(&self) -> f64 {
        self.vertices[self.vertices.len() - 2].1
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let keep = &self.vertices[..self.vertices.len() - 1];
        let mut c = vec![0.0; self.vertices[0].0.len()];
        for (x, _) in keep {
            for (cj, xj) in c.iter_mut().zip(x) {
                *cj += xj;
            }
        }
        for cj in &mut c {
            *cj /= keep.len() as f64;
        }
        c
    }

    /// Largest distance from the centroid to any vertex.
    fn radius(&self, centroid: &[f64]) -> f64 {
        self.vertices
            .iter()
            .map(|(x, _)| {
                x.iter()
                    .zip(centroid)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max)
    }

    /// `centroid + t * (worst - centroid)`, clamped and evaluated.
    fn probe(&self, centroid: &[f64], t: f64) -> (Vec<f64>, f64) {
        let worst = &self.vertices[self.vertices.len() - 1].0;
        let x = centroid
            .iter()
            .zip(worst)
            .map(|(c, w)| c + t * (w - c))
            .collect();
        let x = self.clamp(x);
        let value = self.eval(&x);
        (x, value)
    }

    fn replace_worst(&mut self, vertex: (Vec<f64>, f64)) {
        let last = self.vertices.len() - 1;
        self.vertices[last] = vertex;
        self.sort();
    }

    /// Pull every vertex towards the best one.
    fn shrink(&mut self, sigma: f64) {
        let best = self.vertices[0].0.clone();
        for i in 1..self.vertices.len() {
            let x = self.vertices[i]
                .0
                .iter()
                .zip(&best)
                .map(|(x, b)| b + sigma * (x - b))
                .collect();
            let x = self.clamp(x);
            let value = self.eval(&x);
            self.vertices[i] = (x, value);
        }
        self.sort();
    }
}

/// Minimize `objective` starting from `initial`.
///
/// `bounds` clamps each coordinate to `(min, max)` after every move.
/// Non-finite objective values are treated as `+inf`, so the simplex moves
/// away from regions where the objective is undefined. The search stops
/// when the spread of values falls below `tolerance * (1 + |best|)` or the
/// simplex collapses below `tolerance` in size.
///
/// # Example
/// ```
/// use brent_analytics::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    if initial.is_empty() {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let mut simplex = Simplex::new(objective, initial, bounds, config.initial_step);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let spread = simplex.worst() - simplex.best();
        if spread <= config.tolerance * (1.0 + simplex.best().abs()) {
            converged = true;
            break;
        }
        let centroid = simplex.centroid();
        if simplex.radius(&centroid) < config.tolerance {
            converged = true;
            break;
        }

        let reflected = simplex.probe(&centroid, -config.alpha);
        if reflected.1 < simplex.best() {
            let expanded = simplex.probe(&centroid, -config.alpha * config.gamma);
            if expanded.1 < reflected.1 {
                simplex.replace_worst(expanded);
            } else {
                simplex.replace_worst(reflected);
            }
            continue;
        }
        if reflected.1 < simplex.second_worst() {
            simplex.replace_worst(reflected);
            continue;
        }

        let contracted = if reflected.1 < simplex.worst() {
            let outside = simplex.probe(&centroid, -config.alpha * config.rho);
            (outside.1 <= reflected.1).then_some(outside)
        } else {
            let inside = simplex.probe(&centroid, config.rho);
            (inside.1 < simplex.worst()).then_some(inside)
        };
        match contracted {
            Some(vertex) => simplex.replace_worst(vertex),
            None => simplex.shrink(config.sigma),
        }
    }

    let (optimal_point, optimal_value) = simplex.vertices.swap_remove(0);
    NelderMeadResult {
        optimal_point,
        optimal_value,
        iterations,
        converged,
    }
}
