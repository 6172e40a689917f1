use serde::Deserialize;
use std::fs;

/// Training configuration loaded from a TOML or JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Number of mini-batch iterations.
    pub epochs: usize,
    /// Rows drawn per mini-batch.
    pub batch_size: usize,
    /// Base learning rate.
    pub learning_rate: f64,
    /// Factor applied to the learning rate every `attenuate_epoch` epochs.
    pub learning_attenuate_rate: f64,
    /// Attenuation interval in epochs.
    pub attenuate_epoch: usize,
    /// Fraction of the observed data held out for testing. `0` disables
    /// the validation pass.
    pub test_size_rate: f64,
    /// Convergence tolerance; training stops once the loss change drops
    /// below it.
    pub tol: f64,
    /// Loss-deviation tolerance; training aborts once the loss grows by
    /// more than it in a single epoch.
    pub tld: f64,
    /// Dropout probability applied to the flattened hidden activations.
    pub dropout_rate: f64,
    /// Save per-layer parameters whenever the train loss improves.
    pub save_flag: bool,
    /// Directory receiving per-layer JSON files.
    pub checkpoint_dir: String,
    /// Learning-rate schedule: "step", "constant" or "cosine".
    pub schedule: String,
    /// Metric log directory; `None` falls back to "runs".
    pub log_dir: Option<String>,
    pub experiment: Option<String>,
    /// Pre-learned per-layer parameter files, one per layer in stack
    /// order, loaded before training starts.
    pub pre_learned_paths: Vec<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            batch_size: 20,
            learning_rate: 1e-3,
            learning_attenuate_rate: 0.1,
            attenuate_epoch: 50,
            test_size_rate: 0.3,
            tol: 1e-15,
            tld: 100.0,
            dropout_rate: 0.0,
            save_flag: false,
            checkpoint_dir: "checkpoints".to_string(),
            schedule: "step".to_string(),
            log_dir: None,
            experiment: None,
            pre_learned_paths: Vec::new(),
        }
    }
}

impl TrainConfig {
    /// Load configuration from the given path. Supports TOML or JSON
    /// based on the file extension. Returns `None` if parsing fails.
    pub fn from_path(path: &str) -> Option<Self> {
        let Ok(content) = fs::read_to_string(path) else {
            return None;
        };
        if path.ends_with(".json") {
            serde_json::from_str(&content).ok()
        } else {
            toml::from_str(&content).ok()
        }
    }
}
