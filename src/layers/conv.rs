use super::activation::ActivationFunction;
use super::kernel::KernelT;
use super::layer::{Layer, LayerError};
use crate::math::Matrix;
use crate::tensor::Tensor;
use crate::weights::{load_checkpoint, matrix_to_vec2, save_checkpoint, vec2_to_matrix, ConvLayerJson};

/// 2-D convolution layer using im2col and a [`KernelT`] weight matrix.
///
/// The same weights drive three operations: `convolve` (encode path),
/// `deconvolve` (decode path, transposed convolution through the same
/// kernel) and `back_propagate` (gradient accumulation). The attached
/// activation function fires after convolution, the deactivation
/// function around deconvolution.
pub struct ConvLayer {
    pub kernel: KernelT,
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    stride: usize,
    padding: usize,
    activation: Box<dyn ActivationFunction>,
    deactivation: Box<dyn ActivationFunction>,
    // Cached shapes from the last convolve, needed by back_propagate.
    last_input_shape: (usize, usize, usize), // (batch, in_h, in_w)
    last_output_shape: (usize, usize),       // (out_h, out_w)
}

impl ConvLayer {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        padding: usize,
        activation: Box<dyn ActivationFunction>,
        deactivation: Box<dyn ActivationFunction>,
    ) -> Self {
        let in_dim = in_channels * kernel_size * kernel_size;
        Self {
            kernel: KernelT::new(in_dim, out_channels),
            in_channels,
            out_channels,
            kernel_size,
            stride,
            padding,
            activation,
            deactivation,
            last_input_shape: (0, 0, 0),
            last_output_shape: (0, 0),
        }
    }

    /// Output spatial size for an input extent following
    /// `(n + 2p - k) / s + 1`.
    pub fn out_extent(&self, n: usize) -> Result<usize, LayerError> {
        let padded = n + 2 * self.padding;
        if padded < self.kernel_size {
            return Err(LayerError::KernelExceedsInput {
                input: padded,
                kernel: self.kernel_size,
            });
        }
        Ok((padded - self.kernel_size) / self.stride + 1)
    }

    /// Input spatial size restored by deconvolution: `(n - 1) * s + k - 2p`.
    fn restored_extent(&self, n: usize) -> Result<usize, LayerError> {
        let grown = (n - 1) * self.stride + self.kernel_size;
        if grown < 2 * self.padding {
            return Err(LayerError::KernelExceedsInput {
                input: grown,
                kernel: self.kernel_size,
            });
        }
        Ok(grown - 2 * self.padding)
    }

    fn im2col(&self, x: &Tensor, out_h: usize, out_w: usize) -> Matrix {
        let k = self.kernel_size;
        let mut cols = Matrix::zeros(x.batch * out_h * out_w, self.in_channels * k * k);
        let mut row = 0;
        for b in 0..x.batch {
            for oh in 0..out_h {
                for ow in 0..out_w {
                    let mut col_idx = 0;
                    for ic in 0..self.in_channels {
                        for kh in 0..k {
                            for kw in 0..k {
                                let ih = (oh * self.stride + kh) as isize - self.padding as isize;
                                let iw = (ow * self.stride + kw) as isize - self.padding as isize;
                                let val = if ih >= 0
                                    && ih < x.height as isize
                                    && iw >= 0
                                    && iw < x.width as isize
                                {
                                    x.get(b, ic, ih as usize, iw as usize)
                                } else {
                                    0.0
                                };
                                cols.set(row, col_idx, val);
                                col_idx += 1;
                            }
                        }
                    }
                    row += 1;
                }
            }
        }
        cols
    }

    fn col2im(
        &self,
        cols: &Matrix,
        batch: usize,
        in_h: usize,
        in_w: usize,
        out_h: usize,
        out_w: usize,
    ) -> Tensor {
        let k = self.kernel_size;
        let mut img = Tensor::zeros(batch, self.in_channels, in_h, in_w);
        let mut row = 0;
        for b in 0..batch {
            for oh in 0..out_h {
                for ow in 0..out_w {
                    let mut col_idx = 0;
                    for ic in 0..self.in_channels {
                        for kh in 0..k {
                            for kw in 0..k {
                                let ih = (oh * self.stride + kh) as isize - self.padding as isize;
                                let iw = (ow * self.stride + kw) as isize - self.padding as isize;
                                if ih >= 0
                                    && ih < in_h as isize
                                    && iw >= 0
                                    && iw < in_w as isize
                                {
                                    let v = img.get(b, ic, ih as usize, iw as usize)
                                        + cols.get(row, col_idx);
                                    img.set(b, ic, ih as usize, iw as usize, v);
                                }
                                col_idx += 1;
                            }
                        }
                    }
                    row += 1;
                }
            }
        }
        img
    }

    /// Rearrange `(batch * out_h * out_w, out_channels)` rows into a
    /// `(batch, out_channels, out_h, out_w)` tensor.
    fn rows_to_tensor(&self, out_cols: &Matrix, batch: usize, out_h: usize, out_w: usize) -> Tensor {
        let mut out = Tensor::zeros(batch, self.out_channels, out_h, out_w);
        let mut row = 0;
        for b in 0..batch {
            for oh in 0..out_h {
                for ow in 0..out_w {
                    for oc in 0..self.out_channels {
                        out.set(b, oc, oh, ow, out_cols.get(row, oc));
                    }
                    row += 1;
                }
            }
        }
        out
    }

    /// Inverse of [`ConvLayer::rows_to_tensor`].
    fn tensor_to_rows(&self, x: &Tensor) -> Matrix {
        let mut rows = Matrix::zeros(x.batch * x.height * x.width, self.out_channels);
        let mut row = 0;
        for b in 0..x.batch {
            for oh in 0..x.height {
                for ow in 0..x.width {
                    for oc in 0..self.out_channels {
                        rows.set(row, oc, x.get(b, oc, oh, ow));
                    }
                    row += 1;
                }
            }
        }
        rows
    }

}

impl Layer for ConvLayer {
    fn convolve(&mut self, x: &Tensor, no_bias: bool) -> Result<Tensor, LayerError> {
        if x.channels != self.in_channels {
            return Err(LayerError::ChannelMismatch {
                expected: self.in_channels,
                actual: x.channels,
            });
        }
        let out_h = self.out_extent(x.height)?;
        let out_w = self.out_extent(x.width)?;
        let cols = self.im2col(x, out_h, out_w);
        let out_cols = self.kernel.forward(&cols, no_bias);
        self.last_input_shape = (x.batch, x.height, x.width);
        self.last_output_shape = (out_h, out_w);
        Ok(self.rows_to_tensor(&out_cols, x.batch, out_h, out_w))
    }

    fn deconvolve(&mut self, x: &Tensor) -> Result<Tensor, LayerError> {
        if x.channels != self.out_channels {
            return Err(LayerError::ChannelMismatch {
                expected: self.out_channels,
                actual: x.channels,
            });
        }
        let in_h = self.restored_extent(x.height)?;
        let in_w = self.restored_extent(x.width)?;
        let out_cols = self.tensor_to_rows(x);
        let cols = self.kernel.project_back(&out_cols);
        Ok(self.col2im(&cols, x.batch, in_h, in_w, x.height, x.width))
    }

    fn back_propagate(&mut self, delta: &Tensor) -> Result<Tensor, LayerError> {
        if !self.kernel.has_cached_input() {
            return Err(LayerError::MissingForwardPass);
        }
        if delta.channels != self.out_channels {
            return Err(LayerError::ChannelMismatch {
                expected: self.out_channels,
                actual: delta.channels,
            });
        }
        let (batch, in_h, in_w) = self.last_input_shape;
        let (out_h, out_w) = self.last_output_shape;
        let grad_cols = self.tensor_to_rows(delta);
        let grad_in_cols = self.kernel.backward(&grad_cols);
        Ok(self.col2im(&grad_in_cols, batch, in_h, in_w, out_h, out_w))
    }

    fn activation(&self) -> &dyn ActivationFunction {
        self.activation.as_ref()
    }

    fn deactivation(&self) -> &dyn ActivationFunction {
        self.deactivation.as_ref()
    }

    fn parameters(&mut self) -> Vec<&mut KernelT> {
        vec![&mut self.kernel]
    }

    fn zero_grad(&mut self) {
        self.kernel.zero_grad();
    }

    fn save_params(&self, path: &str) -> Result<(), LayerError> {
        let json = ConvLayerJson {
            w: matrix_to_vec2(&self.kernel.w),
            b: self.kernel.b.clone(),
        };
        save_checkpoint(path, &json).map_err(|e| LayerError::ParamIo(e.to_string()))
    }

    fn load_params(&mut self, path: &str) -> Result<(), LayerError> {
        let json: ConvLayerJson =
            load_checkpoint(path).map_err(|e| LayerError::ParamIo(e.to_string()))?;
        if !json.w.is_empty() {
            self.kernel.w = vec2_to_matrix(&json.w);
        }
        if !json.b.is_empty() {
            self.kernel.b = json.b;
        }
        Ok(())
    }
}
