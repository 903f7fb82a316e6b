use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use candle_core::Device;
use signals::{SignalSet, SinusoidConfig, Split};
use trainer::{Harmonics, Hyperparameters, ModelKind, ModelShape, RunConfig, Task, Trainer};

const POINTS: usize = 16;

fn sinusoids(split: Split) -> SignalSet {
    let config = SinusoidConfig {
        components: 2,
        points: POINTS,
        amp_range: 1.0,
        freq_range: 3,
        noise: 0.05,
        ..SinusoidConfig::default()
    };
    config.generate(24, 11, split)
}

fn run(dir: &Path) -> RunConfig {
    RunConfig {
        seed: 3,
        device: Device::Cpu,
        output_dir: dir.to_path_buf(),
        run_name: "sin_fourier".into(),
        verbose: false,
    }
}

fn hyper(epochs: usize) -> Hyperparameters {
    Hyperparameters {
        learning_rate: 1e-2,
        lr_decay: 0.9,
        epochs,
        batch_size: 8,
        patience: 2,
    }
}

fn shape() -> ModelShape {
    ModelShape {
        input_len: POINTS,
        num_labels: None,
        hidden_dim: 16,
        harmonics: Harmonics::new(3, 1, None).unwrap(),
    }
}

fn metric_rows(run_dir: &Path) -> Vec<String> {
    fs::read_dir(run_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().starts_with("metrics-"))
                .unwrap_or(false)
        })
        .flat_map(|path| {
            fs::read_to_string(path)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_fourier_training_run() {
    let dir = tempfile::tempdir().unwrap();
    let run = run(dir.path());
    let (train, eval, test) = (
        sinusoids(Split::Train),
        sinusoids(Split::Eval),
        sinusoids(Split::Test),
    );

    let mut trainer = Trainer::new(&run, hyper(4), ModelKind::Fourier, &shape()).unwrap();
    assert_eq!(trainer.task(), Task::Reconstruct);

    let stop = AtomicBool::new(false);
    let summary = trainer.train(&train, &eval, &stop, false).unwrap();

    assert!(!summary.interrupted);
    assert!(summary.epochs_run >= 1 && summary.epochs_run <= 4);
    assert!(summary.best_score.is_finite() && summary.best_score >= 0.0);
    if summary.stopped_early {
        assert!(summary.epochs_run >= 3);
    } else {
        assert_eq!(summary.epochs_run, 4);
    }
    assert!(run.checkpoint_path().exists());

    let rows = metric_rows(&run.run_dir());
    assert_eq!(rows[0], "epoch,key,value");
    assert!(rows.iter().any(|row| row.starts_with("1,train_loss,")));
    assert!(rows.iter().any(|row| row.starts_with("1,eval_loss,")));
    assert!(rows.iter().any(|row| row.starts_with("1,best_score,")));
    assert!(!rows.iter().any(|row| row.contains("eval_acc")));

    let report = trainer.test(&test).unwrap();
    assert!(report.accuracy.is_none());
    assert!(report.loss.is_finite());
}

#[test]
fn test_resume_starts_from_stored_score() {
    let dir = tempfile::tempdir().unwrap();
    let run = run(dir.path());
    let (train, eval) = (sinusoids(Split::Train), sinusoids(Split::Eval));

    let first = {
        let mut trainer = Trainer::new(&run, hyper(2), ModelKind::Fourier, &shape()).unwrap();
        trainer
            .train(&train, &eval, &AtomicBool::new(false), false)
            .unwrap()
    };

    let mut trainer = Trainer::new(&run, hyper(2), ModelKind::Fourier, &shape()).unwrap();
    let resumed = trainer
        .train(&train, &eval, &AtomicBool::new(true), true)
        .unwrap();

    assert!(resumed.interrupted);
    assert_eq!(resumed.epochs_run, 0);
    assert_eq!(resumed.best_score, first.best_score);
}

#[test]
fn test_fresh_run_ignores_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let run = run(dir.path());
    let (train, eval) = (sinusoids(Split::Train), sinusoids(Split::Eval));

    let mut trainer = Trainer::new(&run, hyper(1), ModelKind::Fourier, &shape()).unwrap();
    trainer
        .train(&train, &eval, &AtomicBool::new(false), false)
        .unwrap();
    assert!(run.checkpoint_path().exists());

    let mut trainer = Trainer::new(&run, hyper(1), ModelKind::Fourier, &shape()).unwrap();
    let summary = trainer
        .train(&train, &eval, &AtomicBool::new(true), false)
        .unwrap();
    assert_eq!(summary.best_score, f64::INFINITY);
}
