use crate::math::Matrix;
use crate::rng::rng_from_env;
use rand_distr::{Distribution, StandardNormal};

// Weight matrix and bias of a convolution layer in im2col form, together
// with accumulated gradients and per-parameter optimizer state. Keeping
// the Adam moments next to the weights lets the optimizer state persist
// across iterations without bookkeeping in the optimizer itself.

pub struct KernelT {
    /// `(in_channels * k * k, out_channels)` weight matrix.
    pub w: Matrix,
    /// Per-output-channel bias.
    pub b: Vec<f64>,
    grad_w: Matrix,
    grad_b: Vec<f64>,
    m_w: Matrix,
    v_w: Matrix,
    m_b: Vec<f64>,
    v_b: Vec<f64>,
    t: usize,
    last_cols: Matrix,
}

impl KernelT {
    /// Gaussian initialisation scaled by `0.01`.
    pub fn new(in_dim: usize, out_dim: usize) -> Self {
        let mut rng = rng_from_env();
        let w = Matrix::from_vec(
            in_dim,
            out_dim,
            (0..in_dim * out_dim)
                .map(|_| {
                    let g: f64 = StandardNormal.sample(&mut rng);
                    g * 0.01
                })
                .collect(),
        );
        Self {
            grad_w: Matrix::zeros(in_dim, out_dim),
            grad_b: vec![0.0; out_dim],
            m_w: Matrix::zeros(in_dim, out_dim),
            v_w: Matrix::zeros(in_dim, out_dim),
            m_b: vec![0.0; out_dim],
            v_b: vec![0.0; out_dim],
            t: 0,
            last_cols: Matrix::zeros(0, 0),
            w,
            b: vec![0.0; out_dim],
        }
    }

    /// Apply the weight matrix to im2col rows, caching the input so a
    /// later [`KernelT::backward`] can form the weight gradient.
    pub fn forward(&mut self, cols: &Matrix, no_bias: bool) -> Matrix {
        self.last_cols = cols.clone();
        let mut out = Matrix::matmul(cols, &self.w);
        if !no_bias {
            for r in 0..out.rows {
                for c in 0..out.cols {
                    let v = out.get(r, c) + self.b[c];
                    out.set(r, c, v);
                }
            }
        }
        out
    }

    /// Project output rows back through the transposed weights without
    /// touching gradients. Used by deconvolution.
    pub fn project_back(&self, out_cols: &Matrix) -> Matrix {
        Matrix::matmul(out_cols, &self.w.transpose())
    }

    /// Accumulate weight and bias gradients from `grad_cols` and return
    /// the gradient with respect to the cached im2col input.
    pub fn backward(&mut self, grad_cols: &Matrix) -> Matrix {
        let x_t = self.last_cols.transpose();
        let grad_w = Matrix::matmul(&x_t, grad_cols);
        self.grad_w = self.grad_w.add(&grad_w);
        for r in 0..grad_cols.rows {
            for c in 0..grad_cols.cols {
                self.grad_b[c] += grad_cols.get(r, c);
            }
        }
        Matrix::matmul(grad_cols, &self.w.transpose())
    }

    pub fn has_cached_input(&self) -> bool {
        self.last_cols.rows > 0
    }

    pub fn zero_grad(&mut self) {
        self.grad_w = Matrix::zeros(self.grad_w.rows, self.grad_w.cols);
        for g in self.grad_b.iter_mut() {
            *g = 0.0;
        }
    }

    pub fn grad_norm(&self) -> f64 {
        let mut sum = 0.0;
        for g in self.grad_w.data.iter() {
            sum += g * g;
        }
        for g in self.grad_b.iter() {
            sum += g * g;
        }
        sum.sqrt()
    }

    pub fn sgd_step(&mut self, lr: f64, weight_decay: f64) {
        for i in 0..self.grad_w.data.len() {
            let g = self.grad_w.data[i] + weight_decay * self.w.data[i];
            self.w.data[i] -= lr * g;
        }
        for (b, g) in self.b.iter_mut().zip(self.grad_b.iter()) {
            *b -= lr * g;
        }
    }

    pub fn adam_step(&mut self, lr: f64, beta1: f64, beta2: f64, eps: f64, weight_decay: f64) {
        self.t += 1;
        let bc1 = 1.0 - beta1.powi(self.t as i32);
        let bc2 = 1.0 - beta2.powi(self.t as i32);
        for i in 0..self.grad_w.data.len() {
            let g = self.grad_w.data[i] + weight_decay * self.w.data[i];
            self.m_w.data[i] = beta1 * self.m_w.data[i] + (1.0 - beta1) * g;
            self.v_w.data[i] = beta2 * self.v_w.data[i] + (1.0 - beta2) * g * g;
            let m_hat = self.m_w.data[i] / bc1;
            let v_hat = self.v_w.data[i] / bc2;
            self.w.data[i] -= lr * m_hat / (v_hat.sqrt() + eps);
        }
        for i in 0..self.grad_b.len() {
            let g = self.grad_b[i];
            self.m_b[i] = beta1 * self.m_b[i] + (1.0 - beta1) * g;
            self.v_b[i] = beta2 * self.v_b[i] + (1.0 - beta2) * g * g;
            let m_hat = self.m_b[i] / bc1;
            let v_hat = self.v_b[i] / bc2;
            self.b[i] -= lr * m_hat / (v_hat.sqrt() + eps);
        }
    }
}
