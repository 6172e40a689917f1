use super::activation::ActivationFunction;
use super::kernel::KernelT;
use crate::tensor::Tensor;
use std::fmt;

/// Failures raised by per-layer processing.
///
/// The auto-encoder pipeline never recovers from these; it logs the
/// failing stage and index at debug level and returns the error value
/// unchanged to the training loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerError {
    /// Input channel count does not match the layer's configuration.
    ChannelMismatch { expected: usize, actual: usize },
    /// Kernel does not fit into the padded input.
    KernelExceedsInput { input: usize, kernel: usize },
    /// A backward step was requested before any forward pass cached its
    /// shapes.
    MissingForwardPass,
    /// Parameter persistence failed (file I/O or JSON decoding).
    ParamIo(String),
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerError::ChannelMismatch { expected, actual } => write!(
                f,
                "Input has {} channels but the layer expects {}",
                actual, expected
            ),
            LayerError::KernelExceedsInput { input, kernel } => write!(
                f,
                "Kernel size {} exceeds padded input size {}",
                kernel, input
            ),
            LayerError::MissingForwardPass => {
                write!(f, "Backward step requested before any forward pass")
            }
            LayerError::ParamIo(msg) => write!(f, "Parameter I/O failed: {}", msg),
        }
    }
}

impl std::error::Error for LayerError {}

/// Common interface of the ordered stack elements composed by the
/// auto-encoder pipeline.
///
/// Stack order defines the encoder direction; the reversed order defines
/// the decoder direction. Each layer owns its weights together with an
/// activation function for encoding and a deactivation function for the
/// decoding and gradient paths.
pub trait Layer {
    /// Convolve the input. With `no_bias` the bias contribution is
    /// skipped, which the pipeline uses when pushing gradient deltas
    /// through the encoder direction.
    fn convolve(&mut self, x: &Tensor, no_bias: bool) -> Result<Tensor, LayerError>;

    /// Transposed convolution restoring the spatial dims this layer's
    /// `convolve` would have consumed.
    fn deconvolve(&mut self, x: &Tensor) -> Result<Tensor, LayerError>;

    /// Accumulate parameter gradients from `delta` and return the delta
    /// with respect to the layer input.
    fn back_propagate(&mut self, delta: &Tensor) -> Result<Tensor, LayerError>;

    /// Activation applied after `convolve` on the encode path.
    fn activation(&self) -> &dyn ActivationFunction;

    /// Deactivation applied around `deconvolve` on the decode path.
    fn deactivation(&self) -> &dyn ActivationFunction;

    /// Mutable access to the weight/bias parameters for the optimizer.
    fn parameters(&mut self) -> Vec<&mut KernelT>;

    /// Zero accumulated gradients.
    fn zero_grad(&mut self);

    /// Persist parameters as JSON at `path`.
    fn save_params(&self, path: &str) -> Result<(), LayerError>;

    /// Restore parameters saved by [`Layer::save_params`].
    fn load_params(&mut self, path: &str) -> Result<(), LayerError>;
}
