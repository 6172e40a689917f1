use crate::tensor::Tensor;

/// Elementwise activation function attached to a layer.
///
/// `activate` is the encode-direction transform, `forward` is the alias
/// used on the decode path and `backward` weights a tensor by the
/// derivative evaluated at its own values, which is how the decode and
/// gradient paths push values back through the nonlinearity.
pub trait ActivationFunction {
    fn activate(&self, x: &Tensor) -> Tensor;

    fn forward(&self, x: &Tensor) -> Tensor {
        self.activate(x)
    }

    fn backward(&self, y: &Tensor) -> Tensor;
}

fn map(x: &Tensor, f: impl Fn(f64) -> f64) -> Tensor {
    let mut out = x.clone();
    for v in out.data.iter_mut() {
        *v = f(*v);
    }
    out
}

/// Logistic (sigmoid) function.
pub struct LogisticFunction;

impl ActivationFunction for LogisticFunction {
    fn activate(&self, x: &Tensor) -> Tensor {
        map(x, |v| 1.0 / (1.0 + (-v).exp()))
    }

    fn backward(&self, y: &Tensor) -> Tensor {
        map(y, |v| v * (v * (1.0 - v)))
    }
}

/// Hyperbolic tangent function.
pub struct TanhFunction;

impl ActivationFunction for TanhFunction {
    fn activate(&self, x: &Tensor) -> Tensor {
        map(x, f64::tanh)
    }

    fn backward(&self, y: &Tensor) -> Tensor {
        map(y, |v| v * (1.0 - v * v))
    }
}

/// Rectified linear unit.
pub struct ReLuFunction;

impl ActivationFunction for ReLuFunction {
    fn activate(&self, x: &Tensor) -> Tensor {
        map(x, |v| if v < 0.0 { 0.0 } else { v })
    }

    fn backward(&self, y: &Tensor) -> Tensor {
        map(y, |v| if v > 0.0 { v } else { 0.0 })
    }
}

/// Identity passthrough, useful for linear layers and in tests.
pub struct IdentityFunction;

impl ActivationFunction for IdentityFunction {
    fn activate(&self, x: &Tensor) -> Tensor {
        x.clone()
    }

    fn backward(&self, y: &Tensor) -> Tensor {
        y.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_maps_into_unit_interval() {
        let x = Tensor::from_vec(1, 1, 1, 3, vec![-10.0, 0.0, 10.0]);
        let y = LogisticFunction.activate(&x);
        assert!(y.data[0] < 0.001);
        assert!((y.data[1] - 0.5).abs() < 1e-12);
        assert!(y.data[2] > 0.999);
    }

    #[test]
    fn identity_backward_is_passthrough() {
        let x = Tensor::from_vec(1, 1, 2, 2, vec![1.0, -2.0, 3.0, -4.0]);
        assert_eq!(IdentityFunction.backward(&x), x);
    }
}
