use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::TrainError;

/// Appends per-epoch metrics to a CSV file in the run directory.
pub struct Tracker {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl Tracker {
    pub fn create(dir: &Path) -> Result<Self, TrainError> {
        fs::create_dir_all(dir).map_err(|e| TrainError::io(dir, e))?;

        let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
        let path = dir.join(format!("metrics-{}.csv", timestamp));
        let is_new = !path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| TrainError::io(&path, e))?;

        let mut tracker = Self {
            writer: BufWriter::new(file),
            path,
        };
        if is_new {
            tracker.write_line(format_args!("epoch,key,value"))?;
        }

        Ok(tracker)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log(&mut self, epoch: usize, key: &str, value: f64) -> Result<(), TrainError> {
        log::debug!("epoch {} {}: {:.6}", epoch, key, value);
        self.write_line(format_args!("{},{},{}", epoch, key, value))
    }

    fn write_line(&mut self, line: std::fmt::Arguments) -> Result<(), TrainError> {
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| TrainError::io(&self.path, e))
    }
}
