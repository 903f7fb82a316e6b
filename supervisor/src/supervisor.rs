use crate::direction::Direction;
use crate::error::SupervisorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Consecutive non-improving epochs tolerated before stopping.
    pub patience: u32,
    pub direction: Direction,
    /// Hint for the training loop to report counter progress.
    pub verbose: bool,
}

impl SupervisorConfig {
    pub fn new(patience: u32, direction: Direction) -> Self {
        Self {
            patience,
            direction,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// Outcome of a single observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    /// The metric is the best seen so far; the caller should persist a checkpoint.
    pub is_best: bool,
    /// Patience is exhausted; the caller should leave its epoch loop.
    pub should_stop: bool,
    pub best_score: f64,
    pub patience_counter: u32,
}

/// Early stopping with best-checkpoint detection.
///
/// Fed one metric per epoch, in order. Never performs I/O: it only tells
/// the training loop when to save and when to stop. Once stopped, it stays
/// stopped.
#[derive(Clone, Debug)]
pub struct Supervisor {
    best_score: f64,
    patience_counter: u32,
    patience: u32,
    should_stop: bool,
    direction: Direction,
    verbose: bool,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Result<Self, SupervisorError> {
        if config.patience == 0 {
            return Err(SupervisorError::ZeroPatience);
        }

        Ok(Self {
            best_score: config.direction.worst(),
            patience_counter: 0,
            patience: config.patience,
            should_stop: false,
            direction: config.direction,
            verbose: config.verbose,
        })
    }

    /// Starts a run from a score restored alongside a checkpoint.
    pub fn resume(config: SupervisorConfig, best_score: f64) -> Result<Self, SupervisorError> {
        if !best_score.is_finite() {
            return Err(SupervisorError::InvalidMetric(best_score));
        }

        let mut supervisor = Self::new(config)?;
        supervisor.best_score = best_score;
        Ok(supervisor)
    }

    pub fn observe(&mut self, metric: f64) -> Result<Decision, SupervisorError> {
        if !metric.is_finite() {
            return Err(SupervisorError::InvalidMetric(metric));
        }

        if self.should_stop {
            return Ok(self.decision(false));
        }

        if self.direction.improves(metric, self.best_score) {
            self.best_score = metric;
            self.patience_counter = 0;
            return Ok(self.decision(true));
        }

        self.patience_counter += 1;
        if self.patience_counter >= self.patience {
            self.should_stop = true;
        }

        Ok(self.decision(false))
    }

    fn decision(&self, is_best: bool) -> Decision {
        Decision {
            is_best,
            should_stop: self.should_stop,
            best_score: self.best_score,
            patience_counter: self.patience_counter,
        }
    }

    pub fn state(&self) -> RunState {
        if self.should_stop {
            RunState::Stopped
        } else {
            RunState::Running
        }
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    pub fn patience_counter(&self) -> u32 {
        self.patience_counter
    }

    pub fn patience(&self) -> u32 {
        self.patience
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn should_stop(&self) -> bool {
        self.should_stop
    }
}
