pub mod adam;
pub mod dropout;
pub mod lr_scheduler;
pub mod sgd;

pub use adam::Adam;
pub use dropout::DropoutStack;
pub use lr_scheduler::{ConstantLr, CosineLr, LearningRateSchedule, StepLr};
pub use sgd::SGD;

use crate::layers::KernelT;
use crate::math::Matrix;

/// Optimizer handle consumed by the auto-encoder pipeline.
///
/// Besides the parameter update it owns the dropout regularizer applied
/// to the flattened hidden representation between encode and decode,
/// and its inverse on the gradient path.
pub trait OptParams {
    fn dropout_rate(&self) -> f64;

    /// Apply dropout to a `(batch, features)` matrix, memorizing the mask.
    fn dropout(&mut self, x: &Matrix) -> Matrix;

    /// Re-apply the memorized mask to a `(batch, features)` matrix.
    fn de_dropout(&mut self, x: &Matrix) -> Matrix;

    /// Update all parameters in-place with the given learning rate.
    fn step(&mut self, params: &mut [&mut KernelT], lr: f64);
}
