use crate::math::Matrix;
use serde::{Deserialize, Serialize};
use std::{fs, io};

/// Serialised parameters of a single convolution layer.
#[derive(Serialize, Deserialize)]
pub struct ConvLayerJson {
    pub w: Vec<Vec<f64>>,
    pub b: Vec<f64>,
}

/// Convert a [`Matrix`] into a 2-D `Vec` for serialisation.
pub fn matrix_to_vec2(m: &Matrix) -> Vec<Vec<f64>> {
    (0..m.rows)
        .map(|r| (0..m.cols).map(|c| m.get(r, c)).collect())
        .collect()
}

/// Convert a 2-D `Vec` into a [`Matrix`].
pub fn vec2_to_matrix(rows: &[Vec<f64>]) -> Matrix {
    if rows.is_empty() || rows[0].is_empty() {
        return Matrix::zeros(0, 0);
    }
    let r = rows.len();
    let c = rows[0].len();
    let mut mat = Matrix::zeros(r, c);
    for (i, row) in rows.iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            mat.set(i, j, val);
        }
    }
    mat
}

/// Save an arbitrary checkpoint structure to `path` using JSON
/// serialisation. Parent directories are created as needed.
pub fn save_checkpoint<T: Serialize>(path: &str, state: &T) -> Result<(), io::Error> {
    let txt = serde_json::to_string(state).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    if let Some(parent) = std::path::Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, txt)?;
    log::info!("Saved checkpoint to {}", path);
    Ok(())
}

/// Load a checkpoint from `path` that was saved with [`save_checkpoint`].
pub fn load_checkpoint<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, io::Error> {
    let txt = fs::read_to_string(path)?;
    let state = serde_json::from_str(&txt).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    log::info!("Loaded checkpoint from {}", path);
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_round_trip() {
        let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let v = matrix_to_vec2(&m);
        let back = vec2_to_matrix(&v);
        assert_eq!(back, m);
    }

    #[test]
    fn checkpoint_round_trip_creates_parent_dirs() {
        let dir = std::env::temp_dir().join("convae_checkpoint_helpers");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("layer.json");
        let path = path.to_str().unwrap();

        let state = ConvLayerJson {
            w: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            b: vec![0.5, -0.5],
        };
        save_checkpoint(path, &state).unwrap();
        let restored: ConvLayerJson = load_checkpoint(path).unwrap();
        assert_eq!(restored.w, state.w);
        assert_eq!(restored.b, state.b);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn load_checkpoint_reports_missing_file() {
        let r: Result<ConvLayerJson, _> = load_checkpoint("/nonexistent/convae/layer.json");
        assert!(r.is_err());
    }
}
