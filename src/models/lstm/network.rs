//! Single-layer LSTM cell with a linear read-out.
//!
//! Gate pre-activations are `z = W [x, h_prev] + b`, stored as four blocks
//! of `hidden` rows in the order input, forget, cell, output. The read-out
//! is `y = w_out . h_T + b_out` on the final hidden state.

use rand::Rng;

/// LSTM weights.
#[derive(Debug, Clone, PartialEq)]
pub struct LstmNetwork {
    hidden: usize,
    /// `4H x (1 + H)`, row-major.
    w: Vec<f64>,
    /// `4H`
    b: Vec<f64>,
    /// `H`
    w_out: Vec<f64>,
    b_out: f64,
}

/// Gradients with the same shapes as [`LstmNetwork`].
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    w: Vec<f64>,
    b: Vec<f64>,
    w_out: Vec<f64>,
    b_out: f64,
}

impl Gradients {
    fn zeros(hidden: usize) -> Self {
        Self {
            w: vec![0.0; 4 * hidden * (1 + hidden)],
            b: vec![0.0; 4 * hidden],
            w_out: vec![0.0; hidden],
            b_out: 0.0,
        }
    }

    /// Euclidean norm over all parameters.
    pub fn norm(&self) -> f64 {
        let sq = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>();
        (sq(&self.w) + sq(&self.b) + sq(&self.w_out) + self.b_out * self.b_out).sqrt()
    }

    /// Rescale so the norm is at most `max_norm`.
    pub fn clip(&mut self, max_norm: f64) {
        let norm = self.norm();
        if norm > max_norm && norm.is_finite() {
            let factor = max_norm / norm;
            for g in self.w.iter_mut().chain(&mut self.b).chain(&mut self.w_out) {
                *g *= factor;
            }
            self.b_out *= factor;
        }
    }
}

/// Activations of one time step, kept for the backward pass.
#[derive(Debug, Clone)]
struct Step {
    x: f64,
    h_prev: Vec<f64>,
    c_prev: Vec<f64>,
    i: Vec<f64>,
    f: Vec<f64>,
    g: Vec<f64>,
    o: Vec<f64>,
    tanh_c: Vec<f64>,
}

/// Forward activations of a whole window.
#[derive(Debug, Clone)]
pub struct ForwardCache {
    steps: Vec<Step>,
    h_last: Vec<f64>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl LstmNetwork {
    /// Random weights uniform in `±1/sqrt(H)`, zero biases except a forget
    /// gate bias of one.
    pub fn new<R: Rng>(hidden: usize, rng: &mut R) -> Self {
        let bound = 1.0 / (hidden as f64).sqrt();
        let w = (0..4 * hidden * (1 + hidden))
            .map(|_| rng.gen_range(-bound..bound))
            .collect();
        let mut b = vec![0.0; 4 * hidden];
        for bias in &mut b[hidden..2 * hidden] {
            *bias = 1.0;
        }
        let w_out = (0..hidden).map(|_| rng.gen_range(-bound..bound)).collect();
        Self {
            hidden,
            w,
            b,
            w_out,
            b_out: 0.0,
        }
    }

    pub fn hidden_units(&self) -> usize {
        self.hidden
    }

    /// Run a window through the cell from a zero state.
    pub fn forward(&self, inputs: &[f64]) -> (f64, ForwardCache) {
        let h = self.hidden;
        let cols = 1 + h;
        let mut h_prev = vec![0.0; h];
        let mut c_prev = vec![0.0; h];
        let mut steps = Vec::with_capacity(inputs.len());

        for &x in inputs {
            let mut z = self.b.clone();
            for (r, z_r) in z.iter_mut().enumerate() {
                let row = &self.w[r * cols..(r + 1) * cols];
                *z_r += row[0] * x + row[1..].iter().zip(&h_prev).map(|(w, hp)| w * hp).sum::<f64>();
            }

            let i: Vec<f64> = z[..h].iter().map(|&v| sigmoid(v)).collect();
            let f: Vec<f64> = z[h..2 * h].iter().map(|&v| sigmoid(v)).collect();
            let g: Vec<f64> = z[2 * h..3 * h].iter().map(|&v| v.tanh()).collect();
            let o: Vec<f64> = z[3 * h..].iter().map(|&v| sigmoid(v)).collect();

            let c: Vec<f64> = (0..h).map(|k| f[k] * c_prev[k] + i[k] * g[k]).collect();
            let tanh_c: Vec<f64> = c.iter().map(|v| v.tanh()).collect();
            let h_next: Vec<f64> = (0..h).map(|k| o[k] * tanh_c[k]).collect();

            steps.push(Step {
                x,
                h_prev: std::mem::replace(&mut h_prev, h_next),
                c_prev: std::mem::replace(&mut c_prev, c),
                i,
                f,
                g,
                o,
                tanh_c,
            });
        }

        let y = self.b_out + self.w_out.iter().zip(&h_prev).map(|(w, hv)| w * hv).sum::<f64>();
        (y, ForwardCache { steps, h_last: h_prev })
    }

    /// Predict the value following `inputs`.
    pub fn predict(&self, inputs: &[f64]) -> f64 {
        self.forward(inputs).0
    }

    /// Backpropagation through time for `dL/dy = dy`.
    pub fn backward(&self, cache: &ForwardCache, dy: f64) -> Gradients {
        let h = self.hidden;
        let cols = 1 + h;
        let mut grads = Gradients::zeros(h);

        grads.b_out = dy;
        for (gw, hv) in grads.w_out.iter_mut().zip(&cache.h_last) {
            *gw = dy * hv;
        }

        let mut dh: Vec<f64> = self.w_out.iter().map(|w| dy * w).collect();
        let mut dc_next = vec![0.0; h];
        let mut dz = vec![0.0; 4 * h];

        for step in cache.steps.iter().rev() {
            for k in 0..h {
                let (i, f, g, o, tc) = (step.i[k], step.f[k], step.g[k], step.o[k], step.tanh_c[k]);
                let d_o = dh[k] * tc;
                let dc = dc_next[k] + dh[k] * o * (1.0 - tc * tc);
                let d_i = dc * g;
                let d_g = dc * i;
                let d_f = dc * step.c_prev[k];
                dc_next[k] = dc * f;

                dz[k] = d_i * i * (1.0 - i);
                dz[h + k] = d_f * f * (1.0 - f);
                dz[2 * h + k] = d_g * (1.0 - g * g);
                dz[3 * h + k] = d_o * o * (1.0 - o);
            }

            let mut dh_prev = vec![0.0; h];
            for (r, &dz_r) in dz.iter().enumerate() {
                let row = &self.w[r * cols..(r + 1) * cols];
                let grad_row = &mut grads.w[r * cols..(r + 1) * cols];
                grad_row[0] += dz_r * step.x;
                for j in 0..h {
                    grad_row[1 + j] += dz_r * step.h_prev[j];
                    dh_prev[j] += row[1 + j] * dz_r;
                }
                grads.b[r] += dz_r;
            }
            dh = dh_prev;
        }

        grads
    }

    /// Gradient descent step.
    pub fn apply(&mut self, grads: &Gradients, learning_rate: f64) {
        let update = |params: &mut [f64], g: &[f64]| {
            for (p, d) in params.iter_mut().zip(g) {
                *p -= learning_rate * d;
            }
        };
        update(&mut self.w, &grads.w);
        update(&mut self.b, &grads.b);
        update(&mut self.w_out, &grads.w_out);
        self.b_out -= learning_rate * grads.b_out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network(hidden: usize) -> LstmNetwork {
        LstmNetwork::new(hidden, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn zero_input_gives_zero_output() {
        let net = network(4);
        assert_eq!(net.predict(&[0.0; 6]), 0.0);
    }

    #[test]
    fn same_seed_same_weights() {
        assert_eq!(network(5), network(5));
    }

    /// Squared error of one prediction against `target`.
    fn loss(net: &LstmNetwork, inputs: &[f64], target: f64) -> f64 {
        (net.predict(inputs) - target).powi(2)
    }

    #[test]
    fn gradients_match_finite_differences() {
        let net = network(3);
        let inputs = [0.2, 0.7, 0.4, 0.9];
        let target = 0.5;

        let (y, cache) = net.forward(&inputs);
        let grads = net.backward(&cache, 2.0 * (y - target));

        let eps = 1e-6;
        for idx in [0, 5, 13, 27, 40] {
            let mut plus = net.clone();
            plus.w[idx] += eps;
            let mut minus = net.clone();
            minus.w[idx] -= eps;
            let numeric = (loss(&plus, &inputs, target) - loss(&minus, &inputs, target)) / (2.0 * eps);
            assert!(
                (numeric - grads.w[idx]).abs() < 1e-6,
                "w[{idx}]: numeric {numeric} vs analytic {}",
                grads.w[idx]
            );
        }
        for idx in 0..net.b.len() {
            let mut plus = net.clone();
            plus.b[idx] += eps;
            let mut minus = net.clone();
            minus.b[idx] -= eps;
            let numeric = (loss(&plus, &inputs, target) - loss(&minus, &inputs, target)) / (2.0 * eps);
            assert!((numeric - grads.b[idx]).abs() < 1e-6);
        }
    }

    #[test]
    fn clipping_bounds_norm() {
        let net = network(3);
        let (_, cache) = net.forward(&[1.0, -1.0, 2.0]);
        let mut grads = net.backward(&cache, 50.0);
        grads.clip(0.5);
        assert!(grads.norm() <= 0.5 + 1e-12);
    }

    #[test]
    fn descent_step_reduces_loss() {
        let mut net = network(4);
        let inputs = [0.1, 0.3, 0.5];
        let target = 0.9;
        let before = loss(&net, &inputs, target);
        let (y, cache) = net.forward(&inputs);
        let grads = net.backward(&cache, 2.0 * (y - target));
        net.apply(&grads, 0.01);
        assert!(loss(&net, &inputs, target) < before);
    }
}
