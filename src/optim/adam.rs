use super::dropout::DropoutStack;
use super::OptParams;
use crate::layers::KernelT;
use crate::math::Matrix;

/// Adam optimizer carrying the dropout regularizer. The per-parameter
/// moment estimates live in [`KernelT`] so they follow the weights.
pub struct Adam {
    pub beta1: f64,
    pub beta2: f64,
    pub eps: f64,
    pub weight_decay: f64,
    dropout_rate: f64,
    dropout: DropoutStack,
}

impl Adam {
    pub fn new(weight_decay: f64, dropout_rate: f64) -> Self {
        Self {
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            weight_decay,
            dropout_rate,
            dropout: DropoutStack::new(),
        }
    }
}

impl OptParams for Adam {
    fn dropout_rate(&self) -> f64 {
        self.dropout_rate
    }

    fn dropout(&mut self, x: &Matrix) -> Matrix {
        self.dropout.dropout(x, self.dropout_rate)
    }

    fn de_dropout(&mut self, x: &Matrix) -> Matrix {
        self.dropout.de_dropout(x)
    }

    fn step(&mut self, params: &mut [&mut KernelT], lr: f64) {
        for p in params.iter_mut() {
            p.adam_step(lr, self.beta1, self.beta2, self.eps, self.weight_decay);
        }
    }
}
