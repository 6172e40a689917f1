use std::f64::consts::PI;

pub trait LearningRateSchedule {
    fn next_lr(&self, epoch: usize) -> f64;
}

pub struct ConstantLr {
    lr: f64,
}

impl ConstantLr {
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }
}

impl LearningRateSchedule for ConstantLr {
    fn next_lr(&self, _epoch: usize) -> f64 {
        self.lr
    }
}

/// Attenuate the base rate by `gamma` every `step_size` epochs. This is
/// the schedule the trainer builds from `learning_attenuate_rate` and
/// `attenuate_epoch`.
pub struct StepLr {
    base_lr: f64,
    step_size: usize,
    gamma: f64,
}

impl StepLr {
    pub fn new(base_lr: f64, step_size: usize, gamma: f64) -> Self {
        Self {
            base_lr,
            step_size,
            gamma,
        }
    }
}

impl LearningRateSchedule for StepLr {
    fn next_lr(&self, epoch: usize) -> f64 {
        let exp = (epoch / self.step_size) as f64;
        self.base_lr * self.gamma.powf(exp)
    }
}

pub struct CosineLr {
    base_lr: f64,
    max_epochs: usize,
}

impl CosineLr {
    pub fn new(base_lr: f64, max_epochs: usize) -> Self {
        Self { base_lr, max_epochs }
    }
}

impl LearningRateSchedule for CosineLr {
    fn next_lr(&self, epoch: usize) -> f64 {
        let t = epoch.min(self.max_epochs) as f64 / self.max_epochs as f64;
        0.5 * self.base_lr * (1.0 + (PI * t).cos())
    }
}
