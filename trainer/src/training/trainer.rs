use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};

use candle_core::{DType, Device};
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use signals::{SignalError, SignalSet};
use supervisor::{Supervisor, SupervisorConfig};

use crate::checkpoint::CheckpointStore;
use crate::config::{Hyperparameters, ModelShape, RunConfig};
use crate::error::TrainError;
use crate::network::{Model, ModelKind, Task};
use crate::tracking::Tracker;
use crate::training::evaluation::{evaluate, EvalReport};
use crate::training::progress::TrainingProgressBar;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingSummary {
    pub epochs_run: usize,
    pub best_score: f64,
    /// Patience ran out before the epoch budget.
    pub stopped_early: bool,
    /// Stopped on request (Ctrl-C).
    pub interrupted: bool,
}

pub struct Trainer {
    model: Model,
    optimizer: AdamW,
    varmap: VarMap,
    device: Device,
    hyper: Hyperparameters,
    checkpoint: CheckpointStore,
    tracker: Tracker,
    rng: StdRng,
    verbose: bool,
}

impl Trainer {
    pub fn new(
        run: &RunConfig,
        hyper: Hyperparameters,
        kind: ModelKind,
        shape: &ModelShape,
    ) -> Result<Self, TrainError> {
        if hyper.batch_size == 0 {
            return Err(TrainError::Config("batch size must be positive".into()));
        }
        if !(hyper.lr_decay > 0.0 && hyper.lr_decay <= 1.0) {
            return Err(TrainError::Config(format!(
                "learning rate decay {} is outside (0, 1]",
                hyper.lr_decay
            )));
        }

        let run_dir = run.run_dir();
        fs::create_dir_all(&run_dir).map_err(|e| TrainError::io(&run_dir, e))?;
        run.seed_device()?;

        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &run.device);
        let model = Model::new(kind, shape, vs)?;
        let optimizer = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: hyper.learning_rate,
                ..Default::default()
            },
        )?;

        let tracker = Tracker::create(&run_dir)?;
        log::info!("Model will be saved at {}", run.checkpoint_path().display());
        log::info!("Metrics are written to {}", tracker.path().display());

        Ok(Self {
            model,
            optimizer,
            varmap,
            device: run.device.clone(),
            hyper,
            checkpoint: CheckpointStore::new(run.checkpoint_path()),
            tracker,
            rng: StdRng::seed_from_u64(run.seed),
            verbose: run.verbose,
        })
    }

    pub fn task(&self) -> Task {
        self.model.task()
    }

    pub fn num_parameters(&self) -> usize {
        self.varmap
            .all_vars()
            .iter()
            .map(|var| var.as_tensor().elem_count())
            .sum()
    }

    /// Runs epochs until the budget is spent, patience runs out or `stop` is raised.
    ///
    /// With `resume`, an existing checkpoint is loaded first and its score becomes
    /// the one to beat.
    pub fn train(
        &mut self,
        train_set: &SignalSet,
        eval_set: &SignalSet,
        stop: &AtomicBool,
        resume: bool,
    ) -> Result<TrainingSummary, TrainError> {
        for set in [train_set, eval_set] {
            if set.is_empty() {
                return Err(SignalError::Empty(format!("{} split", set.kind)).into());
            }
        }

        let mut supervisor = self.supervisor(resume)?;
        let task = self.task();
        let mut indices = train_set.indices();

        let mut summary = TrainingSummary {
            epochs_run: 0,
            best_score: supervisor.best_score(),
            stopped_early: false,
            interrupted: false,
        };

        for epoch in 1..=self.hyper.epochs {
            if stop.load(Ordering::Relaxed) {
                log::info!("Interrupted before epoch {}", epoch);
                summary.interrupted = true;
                break;
            }

            indices.shuffle(&mut self.rng);
            let (train_loss, report) = self.train_epoch(train_set, eval_set, &indices, epoch)?;
            summary.epochs_run = epoch;

            self.track(epoch, train_loss, &report)?;

            let metric = report.monitored(task);
            let decision = match supervisor.observe(metric) {
                Ok(decision) => decision,
                Err(e) => {
                    log::warn!("Skipping epoch {}: {}", epoch, e);
                    self.decay_learning_rate();
                    continue;
                }
            };
            self.tracker.log(epoch, "best_score", decision.best_score)?;
            summary.best_score = decision.best_score;

            if decision.is_best {
                self.checkpoint.save(&self.varmap, decision.best_score)?;
                log::info!("Model parameters saved at epoch {}", epoch);
            } else if supervisor.is_verbose() {
                log::info!(
                    "Early stopping counter: {} out of {}",
                    decision.patience_counter,
                    supervisor.patience()
                );
            }

            if decision.should_stop {
                log::info!("Early stopping after {} epochs", epoch);
                summary.stopped_early = true;
                break;
            }

            self.decay_learning_rate();
        }

        Ok(summary)
    }

    fn supervisor(&mut self, resume: bool) -> Result<Supervisor, TrainError> {
        let config = SupervisorConfig::new(self.hyper.patience, self.task().direction())
            .verbose(self.verbose);

        if resume {
            if let Some(score) = self.checkpoint.load(&mut self.varmap)? {
                log::info!("Loaded saved parameters with best score {:.6}", score);
                return Ok(Supervisor::resume(config, score)?);
            }
        }

        Ok(Supervisor::new(config)?)
    }

    fn train_epoch(
        &mut self,
        train_set: &SignalSet,
        eval_set: &SignalSet,
        indices: &[usize],
        epoch: usize,
    ) -> Result<(f32, EvalReport), TrainError> {
        let task = self.task();
        let batches = train_set.batches(indices, self.hyper.batch_size, &self.device);
        let progress = TrainingProgressBar::new(batches.num_batches(), epoch)?;

        let mut total_loss = 0.0;
        let mut batches_processed = 0;
        let mut train_loss = 0.0;

        for batch in batches {
            let batch = batch?;
            if batch.is_empty() {
                continue;
            }

            let output = self.model.forward(&batch)?;
            let loss = task.loss(&output, &batch)?;
            self.optimizer.backward_step(&loss)?;

            total_loss += loss.to_scalar::<f32>()?;
            batches_processed += 1;

            train_loss = total_loss / batches_processed as f32;
            progress.update(train_loss);
        }

        let report = evaluate(&self.model, eval_set, self.hyper.batch_size, &self.device)?;
        progress.finish(task.metric_name(), report.monitored(task), train_loss);

        Ok((train_loss, report))
    }

    fn track(&mut self, epoch: usize, train_loss: f32, report: &EvalReport) -> Result<(), TrainError> {
        self.tracker.log(epoch, "train_loss", train_loss as f64)?;
        self.tracker.log(epoch, "eval_loss", report.loss as f64)?;
        if let Some(accuracy) = report.accuracy {
            self.tracker.log(epoch, "eval_acc", accuracy as f64)?;
        }
        Ok(())
    }

    fn decay_learning_rate(&mut self) {
        if self.hyper.lr_decay < 1.0 {
            let new_lr = self.optimizer.learning_rate() * self.hyper.lr_decay;
            self.optimizer.set_learning_rate(new_lr);
        }
    }

    /// Evaluates the best checkpoint, or the current weights when none was saved.
    pub fn test(&mut self, test_set: &SignalSet) -> Result<EvalReport, TrainError> {
        log::info!("Running final test set evaluation...");
        if self.checkpoint.load(&mut self.varmap)?.is_none() {
            log::warn!("No checkpoint found, testing the current weights");
        }

        let report = evaluate(&self.model, test_set, self.hyper.batch_size, &self.device)?;
        log::info!("Test loss: {:.6}", report.loss);
        if let Some(accuracy) = report.accuracy {
            log::info!("Test accuracy: {:.4}", accuracy);
        }

        Ok(report)
    }
}
