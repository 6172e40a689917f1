use super::dropout::DropoutStack;
use super::OptParams;
use crate::layers::KernelT;
use crate::math::Matrix;

/// Plain stochastic gradient descent carrying the dropout regularizer.
pub struct SGD {
    pub weight_decay: f64,
    dropout_rate: f64,
    dropout: DropoutStack,
}

impl SGD {
    pub fn new(weight_decay: f64, dropout_rate: f64) -> Self {
        Self {
            weight_decay,
            dropout_rate,
            dropout: DropoutStack::new(),
        }
    }
}

impl OptParams for SGD {
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
            p.sgd_step(lr, self.weight_decay);
        }
    }
}
