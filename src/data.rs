use crate::rng::rng_from_env;
use crate::tensor::Tensor;
use rand::Rng;

/// Generate a synthetic observed data set of `n` images, each containing
/// a bright axis-aligned rectangle over a noisy background. The samples
/// are learnable by a small auto-encoder and keep the demo binary and
/// trainer tests free of external data files.
pub fn synthetic_blocks(n: usize, channels: usize, height: usize, width: usize) -> Tensor {
    let mut rng = rng_from_env();
    let mut out = Tensor::zeros(n, channels, height, width);
    for b in 0..n {
        let bh = rng.gen_range(1..=height.max(2) / 2);
        let bw = rng.gen_range(1..=width.max(2) / 2);
        let top = rng.gen_range(0..height - bh + 1);
        let left = rng.gen_range(0..width - bw + 1);
        for c in 0..channels {
            for h in 0..height {
                for w in 0..width {
                    let inside = h >= top && h < top + bh && w >= left && w < left + bw;
                    let base = if inside { 0.9 } else { 0.1 };
                    let noise: f64 = rng.gen_range(-0.05..0.05);
                    out.set(b, c, h, w, base + noise);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_blocks_shape_and_range() {
        let data = synthetic_blocks(4, 1, 8, 8);
        assert_eq!(data.dims(), (4, 1, 8, 8));
        assert!(data.data.iter().all(|v| (-0.1..=1.1).contains(v)));
    }
}
