use crate::config::TrainConfig;
use crate::layers::LayerError;
use crate::logging::{Logger, MetricRecord};
use crate::loss::ComputableLoss;
use crate::math;
use crate::memory;
use crate::model::TrainableModel;
use crate::optim::{ConstantLr, CosineLr, LearningRateSchedule, StepLr};
use crate::rng::rng_from_env;
use crate::tensor::Tensor;
use crate::util::logging::log_total_ops;
use crate::verification::FunctionApproximation;
use indicatif::ProgressBar;
use log::{info, warn};
use rand::seq::SliceRandom;
use std::fmt;

/// Errors surfaced by the training loop.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainError {
    /// A layer failure propagated out of the model unchanged.
    Layer(LayerError),
    /// The observed data set has no rows.
    EmptyDataset,
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::Layer(e) => write!(f, "layer processing failed: {}", e),
            TrainError::EmptyDataset => write!(f, "observed data set is empty"),
        }
    }
}

impl std::error::Error for TrainError {}

impl From<LayerError> for TrainError {
    fn from(e: LayerError) -> Self {
        TrainError::Layer(e)
    }
}

/// Summary returned after a training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epochs_run: usize,
    pub final_loss: f64,
    /// The loss change dropped below `tol`.
    pub converged: bool,
    /// The loss grew beyond `tld` or became non-finite.
    pub aborted: bool,
}

/// Generic mini-batch trainer composed with a [`TrainableModel`].
///
/// Owns epoch scheduling, mini-batch sampling, the train/test split,
/// learning-rate attenuation, convergence and divergence stopping, the
/// save flag and pre-learned parameter loading. Reconstruction targets
/// equal the inputs.
pub struct Trainer {
    config: TrainConfig,
    loss: Box<dyn ComputableLoss>,
    verification: FunctionApproximation,
}

impl Trainer {
    pub fn new(config: TrainConfig, loss: Box<dyn ComputableLoss>) -> Self {
        Self {
            config,
            loss,
            verification: FunctionApproximation::new(),
        }
    }

    pub fn verification(&self) -> &FunctionApproximation {
        &self.verification
    }

    fn build_schedule(&self) -> Box<dyn LearningRateSchedule> {
        let cfg = &self.config;
        match cfg.schedule.as_str() {
            "constant" => Box::new(ConstantLr::new(cfg.learning_rate)),
            "cosine" => Box::new(CosineLr::new(cfg.learning_rate, cfg.epochs.max(1))),
            _ => Box::new(StepLr::new(
                cfg.learning_rate,
                cfg.attenuate_epoch.max(1),
                cfg.learning_attenuate_rate,
            )),
        }
    }

    /// Run mini-batch training of `model` on `observed`, a 4-D data set
    /// whose batch dimension indexes the samples.
    pub fn train<M: TrainableModel>(
        &mut self,
        model: &mut M,
        observed: &Tensor,
    ) -> Result<TrainReport, TrainError> {
        if observed.batch == 0 {
            return Err(TrainError::EmptyDataset);
        }
        let cfg = self.config.clone();

        if !cfg.pre_learned_paths.is_empty() {
            model.load(&cfg.pre_learned_paths)?;
            info!("Loaded {} pre-learned layer files", cfg.pre_learned_paths.len());
        }

        let mut rng = rng_from_env();
        let mut indices: Vec<usize> = (0..observed.batch).collect();
        indices.shuffle(&mut rng);
        let test_len = (observed.batch as f64 * cfg.test_size_rate) as usize;
        let (test_idx, train_idx) = indices.split_at(test_len.min(observed.batch - 1));
        let mut train_idx = train_idx.to_vec();
        let test_idx = test_idx.to_vec();

        let schedule = self.build_schedule();
        let mut logger = match Logger::new(cfg.log_dir.clone(), cfg.experiment.clone()) {
            Ok(l) => Some(l),
            Err(e) => {
                warn!("Metric logging disabled: {}", e);
                None
            }
        };
        let pb = ProgressBar::new(cfg.epochs as u64);

        math::reset_matrix_ops();

        let mut prev_loss: Option<f64> = None;
        let mut best_loss = f64::INFINITY;
        let mut report = TrainReport {
            epochs_run: 0,
            final_loss: f64::NAN,
            converged: false,
            aborted: false,
        };

        for epoch in 0..cfg.epochs {
            let lr = schedule.next_lr(epoch);

            train_idx.shuffle(&mut rng);
            let take = cfg.batch_size.min(train_idx.len()).max(1);
            let batch = observed.select_batch(&train_idx[..take]);

            let pred = model.forward(&batch)?;
            let train_loss = self.loss.loss(&pred, &batch);
            report.epochs_run = epoch + 1;
            report.final_loss = train_loss;

            if !train_loss.is_finite() {
                warn!("Aborting: loss became non-finite in epoch {}", epoch);
                report.aborted = true;
                break;
            }
            if let Some(prev) = prev_loss {
                if train_loss - prev > cfg.tld {
                    warn!(
                        "Aborting: loss deviated by {:.6} in epoch {} (tld {:.6})",
                        train_loss - prev,
                        epoch,
                        cfg.tld
                    );
                    report.aborted = true;
                    break;
                }
            }

            let delta = self.loss.delta(&pred, &batch);
            model.backward(&delta)?;
            model.update(lr);

            if let Some(l) = logger.as_mut() {
                l.log(&MetricRecord {
                    epoch,
                    step: epoch,
                    loss: train_loss,
                    lr,
                    kind: "train",
                });
            }

            let mut test_loss = train_loss;
            if !test_idx.is_empty() {
                let take = cfg.batch_size.min(test_idx.len());
                let test_batch = observed.select_batch(&test_idx[..take]);
                let test_pred = model.inference(&test_batch)?;
                test_loss = self.loss.loss(&test_pred, &test_batch);
                if let Some(l) = logger.as_mut() {
                    l.log(&MetricRecord {
                        epoch,
                        step: epoch,
                        loss: test_loss,
                        lr,
                        kind: "test",
                    });
                }
            }
            self.verification.verificate(epoch, train_loss, test_loss);

            if cfg.save_flag && train_loss < best_loss {
                best_loss = train_loss;
                model.save(&cfg.checkpoint_dir)?;
            }

            if let Some(prev) = prev_loss {
                if (prev - train_loss).abs() < cfg.tol {
                    info!("Converged in epoch {} (tol {:e})", epoch, cfg.tol);
                    report.converged = true;
                    break;
                }
            }
            prev_loss = Some(train_loss);
            pb.inc(1);
        }

        pb.finish_and_clear();
        log_total_ops(math::matrix_ops_count());
        info!("Peak memory: {} bytes", memory::peak_memory_bytes());
        Ok(report)
    }
}
