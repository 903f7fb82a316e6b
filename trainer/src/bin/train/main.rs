mod args;

use args::Args;
use clap::Parser;
use log::LevelFilter;
use signals::{DataSource, SignalError, SignalSet, Split};
use simplelog::{Config, SimpleLogger};
use std::{
    error::Error,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use trainer::{
    get_device, Harmonics, Hyperparameters, ModelShape, RunConfig, Task, TrainError, Trainer,
};

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_handler = Arc::clone(&stop_flag);

    ctrlc::set_handler(move || {
        log::info!("Received SIGINT, stopping after this epoch...");
        stop_flag_handler.store(true, Ordering::Relaxed);
    })?;

    let run = RunConfig {
        seed: args.seed,
        device: get_device(args.device, args.device_ordinal),
        output_dir: args.output_dir.clone(),
        run_name: args.run_name(),
        verbose: args.verbose,
    };

    let (train_set, eval_set, test_set) = load_splits(&args, &run)?;
    let shape = model_shape(&args, &train_set)?;

    let hyper = Hyperparameters {
        learning_rate: args.learning_rate,
        lr_decay: args.lr_decay,
        epochs: args.epochs,
        batch_size: args.batch_size,
        patience: args.patience,
    };

    log::info!("Creating {:?} model", args.model);
    let mut trainer = Trainer::new(&run, hyper, args.model, &shape)?;
    log::info!("Model has {} parameters", trainer.num_parameters());

    log::info!("Training network");
    let summary = trainer.train(&train_set, &eval_set, &stop_flag, !args.fresh)?;
    log::info!(
        "Finished after {} epochs, best {} {:.6}",
        summary.epochs_run,
        trainer.task().metric_name(),
        summary.best_score
    );

    trainer.test(&test_set)?;

    log::info!("Done!");
    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::init(level, Config::default())?;

    Ok(args)
}

fn load_splits(
    args: &Args,
    run: &RunConfig,
) -> Result<(SignalSet, SignalSet, SignalSet), Box<dyn Error>> {
    let mut source = DataSource::new(&args.dataset_path);
    source.samples_per_split = args.samples;

    if !args.dataset.has_splits() {
        log::info!("{} is a single series, every split uses it", args.dataset);
    }

    let mut sets = Vec::with_capacity(Split::ALL.len());
    for split in Split::ALL {
        let set = args.dataset.load(&source, split, run.seed)?;
        if set.is_empty() {
            return Err(SignalError::Empty(format!("{} {} split", args.dataset, split)).into());
        }
        log::info!("Loaded {} {} signals", set.len(), split);
        sets.push(set);
    }

    let mut sets = sets.into_iter();
    match (sets.next(), sets.next(), sets.next()) {
        (Some(train), Some(eval), Some(test)) => Ok((train, eval, test)),
        _ => Err("expected train, eval and test splits".into()),
    }
}

fn model_shape(args: &Args, train_set: &SignalSet) -> Result<ModelShape, Box<dyn Error>> {
    if args.model.task() == Task::Classify && !train_set.is_labelled() {
        return Err(TrainError::Config(format!(
            "{:?} is a classifier but {} has no labels",
            args.model, args.dataset
        ))
        .into());
    }

    Ok(ModelShape {
        input_len: train_set.signal_len()?,
        num_labels: train_set.num_labels(),
        hidden_dim: args.hidden_dim,
        harmonics: Harmonics::new(args.n_harmonics, args.lower_bound, args.upper_bound)?,
    })
}
