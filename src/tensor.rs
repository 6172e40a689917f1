use crate::math::Matrix;

/// 4-D batch tensor `(batch, channels, height, width)` backed by a flat
/// `Vec<f64>` in row-major order.
///
/// Every layer transformation in the auto-encoder preserves the batch
/// dimension; the spatial dimensions change with convolution and
/// deconvolution. Conversion helpers to and from the 2-D [`Matrix`] type
/// cover the flattened hidden representation used by dropout.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub batch: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
    /// Elements in `(batch, channel, row, col)` order.
    pub data: Vec<f64>,
}

impl Tensor {
    pub fn zeros(batch: usize, channels: usize, height: usize, width: usize) -> Self {
        Tensor {
            batch,
            channels,
            height,
            width,
            data: vec![0.0; batch * channels * height * width],
        }
    }

    /// The empty-equivalent tensor used before any forward pass has run.
    pub fn empty() -> Self {
        Tensor::zeros(0, 0, 0, 0)
    }

    pub fn from_vec(
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
        data: Vec<f64>,
    ) -> Self {
        assert_eq!(data.len(), batch * channels * height * width);
        Tensor {
            batch,
            channels,
            height,
            width,
            data,
        }
    }

    pub fn dims(&self) -> (usize, usize, usize, usize) {
        (self.batch, self.channels, self.height, self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn offset(&self, b: usize, c: usize, h: usize, w: usize) -> usize {
        ((b * self.channels + c) * self.height + h) * self.width + w
    }

    pub fn get(&self, b: usize, c: usize, h: usize, w: usize) -> f64 {
        self.data[self.offset(b, c, h, w)]
    }

    pub fn set(&mut self, b: usize, c: usize, h: usize, w: usize, v: f64) {
        let i = self.offset(b, c, h, w);
        self.data[i] = v;
    }

    /// Flatten to `(batch, channels * height * width)` keeping element order.
    pub fn flatten(&self) -> Matrix {
        Matrix::from_vec(
            self.batch,
            self.channels * self.height * self.width,
            self.data.clone(),
        )
    }

    /// Rebuild a 4-D tensor from a flattened matrix using recorded dims.
    /// The matrix row count supplies the batch dimension.
    pub fn from_flat(m: &Matrix, channels: usize, height: usize, width: usize) -> Self {
        assert_eq!(m.cols, channels * height * width);
        Tensor {
            batch: m.rows,
            channels,
            height,
            width,
            data: m.data.clone(),
        }
    }

    /// Gather the listed batch rows into a new tensor. Used by the trainer
    /// to assemble mini-batches out of the full observed data set.
    pub fn select_batch(&self, indices: &[usize]) -> Tensor {
        let sample = self.channels * self.height * self.width;
        let mut data = Vec::with_capacity(indices.len() * sample);
        for &i in indices {
            let start = i * sample;
            data.extend_from_slice(&self.data[start..start + sample]);
        }
        Tensor::from_vec(indices.len(), self.channels, self.height, self.width, data)
    }
}
