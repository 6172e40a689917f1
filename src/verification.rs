use log::info;

/// Records train/test reconstruction losses per epoch and reports them
/// at info level. The retained history lets callers inspect the loss
/// curve after a run.
pub struct FunctionApproximation {
    history: Vec<(f64, f64)>,
}

impl FunctionApproximation {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    pub fn verificate(&mut self, epoch: usize, train_loss: f64, test_loss: f64) {
        info!(
            "epoch {} train loss {:.6} test loss {:.6}",
            epoch, train_loss, test_loss
        );
        self.history.push((train_loss, test_loss));
    }

    pub fn history(&self) -> &[(f64, f64)] {
        &self.history
    }
}

impl Default for FunctionApproximation {
    fn default() -> Self {
        Self::new()
    }
}
