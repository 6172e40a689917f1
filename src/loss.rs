use crate::tensor::Tensor;

/// Loss function over reconstruction and target batches.
pub trait ComputableLoss {
    /// Mean loss across all elements of the batch.
    fn loss(&self, pred: &Tensor, target: &Tensor) -> f64;

    /// Gradient of the loss with respect to the prediction.
    fn delta(&self, pred: &Tensor, target: &Tensor) -> Tensor;
}

/// Mean squared error, the default reconstruction loss.
pub struct MeanSquaredError;

impl ComputableLoss for MeanSquaredError {
    fn loss(&self, pred: &Tensor, target: &Tensor) -> f64 {
        assert_eq!(pred.dims(), target.dims());
        let n = pred.data.len() as f64;
        let mut sum = 0.0;
        for (p, t) in pred.data.iter().zip(target.data.iter()) {
            let d = p - t;
            sum += d * d;
        }
        0.5 * sum / n
    }

    fn delta(&self, pred: &Tensor, target: &Tensor) -> Tensor {
        assert_eq!(pred.dims(), target.dims());
        let n = pred.data.len() as f64;
        let mut out = pred.clone();
        for (o, t) in out.data.iter_mut().zip(target.data.iter()) {
            *o = (*o - t) / n;
        }
        out
    }
}

/// Cross entropy for reconstructions squashed into `(0, 1)` by a
/// logistic output layer.
pub struct CrossEntropy;

impl ComputableLoss for CrossEntropy {
    fn loss(&self, pred: &Tensor, target: &Tensor) -> f64 {
        assert_eq!(pred.dims(), target.dims());
        let n = pred.data.len() as f64;
        let mut sum = 0.0;
        for (p, t) in pred.data.iter().zip(target.data.iter()) {
            let p = p.clamp(1e-12, 1.0 - 1e-12);
            sum += -(t * p.ln() + (1.0 - t) * (1.0 - p).ln());
        }
        sum / n
    }

    fn delta(&self, pred: &Tensor, target: &Tensor) -> Tensor {
        assert_eq!(pred.dims(), target.dims());
        let n = pred.data.len() as f64;
        let mut out = pred.clone();
        for (o, t) in out.data.iter_mut().zip(target.data.iter()) {
            *o = (*o - t) / n;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mse_is_zero_on_identical_tensors() {
        let a = Tensor::from_vec(1, 1, 2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(MeanSquaredError.loss(&a, &a), 0.0);
    }

    #[test]
    fn mse_delta_points_toward_target() {
        let p = Tensor::from_vec(1, 1, 1, 2, vec![1.0, 0.0]);
        let t = Tensor::from_vec(1, 1, 1, 2, vec![0.0, 0.0]);
        let d = MeanSquaredError.delta(&p, &t);
        assert!(d.data[0] > 0.0);
        assert_eq!(d.data[1], 0.0);
    }
}
