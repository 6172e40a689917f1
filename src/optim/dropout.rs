use crate::math::Matrix;
use crate::rng::rng_from_env;
use rand::Rng;

/// Inverted dropout over the flattened hidden representation.
///
/// Each forward application pushes the generated mask on a stack; the
/// matching `de_dropout` call during the gradient pass pops it again so
/// the same units are silenced in both directions. Kept elements are
/// scaled by `1 / (1 - p)` to preserve the expected activation.
pub struct DropoutStack {
    masks: Vec<Vec<f64>>,
    rng: rand::rngs::StdRng,
}

impl DropoutStack {
    pub fn new() -> Self {
        Self {
            masks: Vec::new(),
            rng: rng_from_env(),
        }
    }

    pub fn dropout(&mut self, x: &Matrix, rate: f64) -> Matrix {
        let mut out = Matrix::zeros(x.rows, x.cols);
        let mut mask = vec![0.0; x.data.len()];
        let scale = if rate < 1.0 { 1.0 / (1.0 - rate) } else { 0.0 };
        for i in 0..x.data.len() {
            if self.rng.gen::<f64>() < rate {
                mask[i] = 0.0;
            } else {
                mask[i] = scale;
                out.data[i] = x.data[i] * scale;
            }
        }
        self.masks.push(mask);
        out
    }

    /// Re-apply the most recent mask. Without a memorized mask the input
    /// passes through unchanged.
    pub fn de_dropout(&mut self, x: &Matrix) -> Matrix {
        let Some(mask) = self.masks.pop() else {
            return x.clone();
        };
        let mut out = Matrix::zeros(x.rows, x.cols);
        for i in 0..x.data.len().min(mask.len()) {
            out.data[i] = x.data[i] * mask[i];
        }
        out
    }
}

impl Default for DropoutStack {
    fn default() -> Self {
        Self::new()
    }
}
