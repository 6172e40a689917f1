use crate::layers::{Layer, LayerError};
use crate::optim::OptParams;
use crate::tensor::Tensor;
use crate::util::logging::{log_convolution_failure, log_deconvolution_failure};

/// Capability interface shared by trainable models. The generic trainer
/// drives anything implementing this instead of relying on a base class.
pub trait TrainableModel {
    /// Training-mode forward pass (dropout active when configured).
    fn forward(&mut self, x: &Tensor) -> Result<Tensor, LayerError>;

    /// Propagate a gradient delta back through the model, accumulating
    /// parameter gradients as a side effect.
    fn backward(&mut self, delta: &Tensor) -> Result<Tensor, LayerError>;

    /// Inference-mode forward pass with the regularizer bypassed.
    fn inference(&mut self, x: &Tensor) -> Result<Tensor, LayerError>;

    /// Apply one optimizer step with the given learning rate, then clear
    /// the accumulated gradients.
    fn update(&mut self, lr: f64);

    /// Persist per-layer parameters under `dir`.
    fn save(&self, dir: &str) -> Result<(), LayerError>;

    /// Restore per-layer parameters from explicit file paths, one per
    /// layer in stack order.
    fn load(&mut self, paths: &[String]) -> Result<(), LayerError>;
}

/// Convolutional auto-encoder pipeline.
///
/// Composes an ordered layer stack with the optimizer's dropout
/// regularizer and a cache of the most recent encoded tensor. The stack
/// order is the encoder order; the reversed order is the decoder order.
/// One instance is driven by one training loop at a time; the feature
/// cache is overwritten non-atomically between calls, so concurrent use
/// must be serialized by the caller.
pub struct ConvAutoEncoder {
    layers: Vec<Box<dyn Layer>>,
    opt_params: Box<dyn OptParams>,
    feature_points: Tensor,
}

impl ConvAutoEncoder {
    pub fn new(layers: Vec<Box<dyn Layer>>, opt_params: Box<dyn OptParams>) -> Self {
        Self {
            layers,
            opt_params,
            feature_points: Tensor::empty(),
        }
    }

    /// The bottleneck tensor captured by the most recent forward pass.
    /// Before any forward pass this is the empty-equivalent tensor.
    pub fn extract_feature_points(&self) -> &Tensor {
        &self.feature_points
    }

    /// Encode then decode `x`. Every failing per-layer step is logged at
    /// debug level with its traversal index before the error is returned
    /// unchanged; no partial tensor escapes.
    fn forward_mode(&mut self, x: &Tensor, train: bool) -> Result<Tensor, LayerError> {
        let mut t = x.clone();

        for (i, layer) in self.layers.iter_mut().enumerate() {
            t = match layer.convolve(&t, false) {
                Ok(out) => layer.activation().activate(&out),
                Err(e) => {
                    log_convolution_failure(i + 1);
                    return Err(e);
                }
            };
        }

        self.feature_points = t.clone();

        if train && self.opt_params.dropout_rate() > 0.0 {
            let (_, c, h, w) = t.dims();
            let hidden = self.opt_params.dropout(&t.flatten());
            t = Tensor::from_flat(&hidden, c, h, w);
        }

        for (i, layer) in self.layers.iter_mut().rev().enumerate() {
            let back = layer.deactivation().backward(&t);
            t = match layer.deconvolve(&back) {
                Ok(out) => layer.deactivation().forward(&out),
                Err(e) => {
                    log_deconvolution_failure(i + 1);
                    return Err(e);
                }
            };
        }

        Ok(t)
    }
}

impl TrainableModel for ConvAutoEncoder {
    fn forward(&mut self, x: &Tensor) -> Result<Tensor, LayerError> {
        self.forward_mode(x, true)
    }

    fn inference(&mut self, x: &Tensor) -> Result<Tensor, LayerError> {
        self.forward_mode(x, false)
    }

    fn backward(&mut self, delta: &Tensor) -> Result<Tensor, LayerError> {
        let mut d = delta.clone();

        // Gradient w.r.t. inputs only on this pass, so bias stays out.
        for (i, layer) in self.layers.iter_mut().enumerate() {
            d = match layer.convolve(&d, true) {
                Ok(out) => out,
                Err(e) => {
                    log_convolution_failure(i + 1);
                    return Err(e);
                }
            };
        }

        if self.opt_params.dropout_rate() > 0.0 {
            let (_, c, h, w) = d.dims();
            let hidden = self.opt_params.de_dropout(&d.flatten());
            d = Tensor::from_flat(&hidden, c, h, w);
        }

        let n = self.layers.len();
        for (i, layer) in self.layers.iter_mut().rev().enumerate() {
            // The reversed traversal reports `n - i`, counting from the
            // end, unlike the forward-style `i + 1` above.
            d = match layer.back_propagate(&d) {
                Ok(out) => layer.deactivation().activate(&out),
                Err(e) => {
                    log_deconvolution_failure(n - i);
                    return Err(e);
                }
            };
        }

        Ok(d)
    }

    fn update(&mut self, lr: f64) {
        let Self {
            layers, opt_params, ..
        } = self;
        let mut params = Vec::new();
        for layer in layers.iter_mut() {
            params.extend(layer.parameters());
        }
        opt_params.step(&mut params, lr);
        for layer in layers.iter_mut() {
            layer.zero_grad();
        }
    }

    fn save(&self, dir: &str) -> Result<(), LayerError> {
        for (i, layer) in self.layers.iter().enumerate() {
            let path = format!("{}/layer_{}.json", dir, i + 1);
            layer.save_params(&path)?;
        }
        Ok(())
    }

    fn load(&mut self, paths: &[String]) -> Result<(), LayerError> {
        for (layer, path) in self.layers.iter_mut().zip(paths.iter()) {
            layer.load_params(path)?;
        }
        Ok(())
    }
}
