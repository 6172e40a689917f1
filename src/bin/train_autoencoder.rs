use convae::config::TrainConfig;
use convae::data::synthetic_blocks;
use convae::layers::{ConvLayer, Layer, TanhFunction};
use convae::loss::MeanSquaredError;
use convae::model::{ConvAutoEncoder, TrainableModel};
use convae::optim::{Adam, OptParams, SGD};
use convae::trainer::Trainer;
use std::env;

/// Train a small convolutional auto-encoder on synthetic block images.
///
/// Usage: `train_autoencoder [sgd|adam] [--config path]`
fn main() {
    env_logger::init();

    let mut opt = "sgd".to_string();
    let mut config_path: Option<String> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(p) = args.next() {
                    config_path = Some(p);
                }
            }
            other => opt = other.to_string(),
        }
    }

    let config = config_path
        .as_deref()
        .and_then(TrainConfig::from_path)
        .unwrap_or_default();

    let opt_params: Box<dyn OptParams> = match opt.as_str() {
        "adam" => Box::new(Adam::new(0.0, config.dropout_rate)),
        _ => Box::new(SGD::new(0.0, config.dropout_rate)),
    };

    let layers: Vec<Box<dyn Layer>> = vec![
        Box::new(ConvLayer::new(
            1,
            8,
            3,
            1,
            1,
            Box::new(TanhFunction),
            Box::new(TanhFunction),
        )),
        Box::new(ConvLayer::new(
            8,
            4,
            3,
            1,
            1,
            Box::new(TanhFunction),
            Box::new(TanhFunction),
        )),
    ];
    let mut model = ConvAutoEncoder::new(layers, opt_params);

    let observed = synthetic_blocks(64, 1, 8, 8);
    let mut trainer = Trainer::new(config.clone(), Box::new(MeanSquaredError));

    match trainer.train(&mut model, &observed) {
        Ok(report) => {
            log::info!(
                "Finished after {} epochs with loss {:.6} (converged: {}, aborted: {})",
                report.epochs_run,
                report.final_loss,
                report.converged,
                report.aborted
            );
            let fp = model.extract_feature_points();
            log::info!(
                "Feature points shape: ({}, {}, {}, {})",
                fp.batch,
                fp.channels,
                fp.height,
                fp.width
            );
            if !config.save_flag {
                if let Err(e) = model.save(&config.checkpoint_dir) {
                    log::error!("Failed to save model: {}", e);
                }
            }
        }
        Err(e) => log::error!("Training failed: {}", e),
    }
}
