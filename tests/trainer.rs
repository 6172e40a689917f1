use convae::config::TrainConfig;
use convae::data::synthetic_blocks;
use convae::layers::{ConvLayer, IdentityFunction, Layer};
use convae::loss::MeanSquaredError;
use convae::model::{ConvAutoEncoder, TrainableModel};
use convae::optim::SGD;
use convae::tensor::Tensor;
use convae::trainer::{TrainError, Trainer};

fn linear_model(dropout_rate: f64) -> ConvAutoEncoder {
    let layers: Vec<Box<dyn Layer>> = vec![Box::new(ConvLayer::new(
        1,
        2,
        3,
        1,
        1,
        Box::new(IdentityFunction),
        Box::new(IdentityFunction),
    ))];
    ConvAutoEncoder::new(layers, Box::new(SGD::new(0.0, dropout_rate)))
}

fn base_config() -> TrainConfig {
    TrainConfig {
        epochs: 150,
        batch_size: 8,
        learning_rate: 0.5,
        learning_attenuate_rate: 0.5,
        attenuate_epoch: 100,
        test_size_rate: 0.25,
        tol: 0.0,
        tld: 100.0,
        dropout_rate: 0.0,
        save_flag: false,
        checkpoint_dir: "checkpoints".to_string(),
        schedule: "step".to_string(),
        log_dir: Some(std::env::temp_dir().join("convae_runs").to_str().unwrap().to_string()),
        experiment: None,
        pre_learned_paths: Vec::new(),
    }
}

#[test]
fn training_runs_and_records_history() {
    let mut model = linear_model(0.0);
    let observed = synthetic_blocks(16, 1, 6, 6);
    let mut trainer = Trainer::new(base_config(), Box::new(MeanSquaredError));
    let report = trainer.train(&mut model, &observed).unwrap();

    assert!(!report.aborted);
    assert!(report.final_loss.is_finite());
    let history = trainer.verification().history();
    assert_eq!(history.len(), report.epochs_run);
    assert!(history.iter().all(|(tr, te)| tr.is_finite() && te.is_finite()));
    // a forward pass ran, so the bottleneck cache is populated
    assert!(!model.extract_feature_points().is_empty());
}

#[test]
fn converges_early_when_loss_plateaus() {
    let mut model = linear_model(0.0);
    let observed = synthetic_blocks(8, 1, 4, 4);
    let mut cfg = base_config();
    // zero learning rate freezes the loss, so the tolerance check fires
    cfg.learning_rate = 0.0;
    cfg.schedule = "constant".to_string();
    cfg.tol = 1e-12;
    cfg.epochs = 50;
    cfg.batch_size = 32;
    cfg.test_size_rate = 0.0;
    let mut trainer = Trainer::new(cfg, Box::new(MeanSquaredError));
    let report = trainer.train(&mut model, &observed).unwrap();
    assert!(report.converged);
    assert!(report.epochs_run < 50);
}

#[test]
fn aborts_when_loss_diverges() {
    let mut model = linear_model(0.0);
    let observed = synthetic_blocks(8, 1, 4, 4);
    let mut cfg = base_config();
    cfg.learning_rate = 1e6;
    cfg.schedule = "constant".to_string();
    cfg.tld = 0.0;
    cfg.epochs = 50;
    let mut trainer = Trainer::new(cfg, Box::new(MeanSquaredError));
    let report = trainer.train(&mut model, &observed).unwrap();
    assert!(report.aborted);
}

#[test]
fn training_proceeds_when_metric_dir_is_unwritable() {
    let mut model = linear_model(0.0);
    let observed = synthetic_blocks(8, 1, 4, 4);
    let mut cfg = base_config();
    cfg.epochs = 3;
    // /dev/null is a file, so creating a directory beneath it fails
    cfg.log_dir = Some("/dev/null/convae_metrics".to_string());
    let mut trainer = Trainer::new(cfg, Box::new(MeanSquaredError));
    let report = trainer.train(&mut model, &observed).unwrap();
    assert!(report.final_loss.is_finite());
}

#[test]
fn empty_dataset_is_rejected() {
    let mut model = linear_model(0.0);
    let mut trainer = Trainer::new(base_config(), Box::new(MeanSquaredError));
    let err = trainer.train(&mut model, &Tensor::empty()).unwrap_err();
    assert_eq!(err, TrainError::EmptyDataset);
}

#[test]
fn save_flag_writes_per_layer_checkpoints() {
    let dir = std::env::temp_dir().join("convae_save_flag");
    let _ = std::fs::remove_dir_all(&dir);

    let mut model = linear_model(0.0);
    let observed = synthetic_blocks(8, 1, 4, 4);
    let mut cfg = base_config();
    cfg.epochs = 5;
    cfg.save_flag = true;
    cfg.checkpoint_dir = dir.to_str().unwrap().to_string();
    let mut trainer = Trainer::new(cfg, Box::new(MeanSquaredError));
    trainer.train(&mut model, &observed).unwrap();

    assert!(dir.join("layer_1.json").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn pre_learned_parameters_restore_the_same_model() {
    let dir = std::env::temp_dir().join("convae_pre_learned");
    let _ = std::fs::remove_dir_all(&dir);

    let mut trained = linear_model(0.0);
    trained.save(dir.to_str().unwrap()).unwrap();

    let mut restored = linear_model(0.0);
    let paths = vec![dir.join("layer_1.json").to_str().unwrap().to_string()];
    restored.load(&paths).unwrap();

    let x = synthetic_blocks(2, 1, 4, 4);
    let a = trained.inference(&x).unwrap();
    let b = restored.inference(&x).unwrap();
    assert_eq!(a, b);

    let _ = std::fs::remove_dir_all(&dir);
}
