use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SignalError;
use crate::kind::DatasetKind;
use crate::signal::{Signal, SignalSet};

pub const FILE_NAME: &str = "day_temp_atmospheric.csv";

/// Rows averaged into one point (daily readings to weekly).
pub const RESAMPLE: usize = 7;

/// Daily rows considered when computing the mean temperature.
const TOTAL_DAYS: usize = 3287;

/// Daily rows kept in the trajectory (six years).
const KEPT_DAYS: usize = 365 * 6;

/// Reads `day,temp` rows and returns weekly means as one trajectory.
///
/// Temperatures are divided by the mean over all weeks, days by 365.
pub fn load(root: &Path) -> Result<SignalSet, SignalError> {
    let path = root.join(FILE_NAME);
    let file = File::open(&path).map_err(|e| SignalError::io(&path, e))?;
    let rows = read_rows(BufReader::new(file), &path)?;

    let signal = resample(&rows).ok_or_else(|| SignalError::Empty(path.display().to_string()))?;
    log::info!(
        "Loaded {} weekly temperature points from {} days",
        signal.len(),
        rows.len()
    );

    Ok(SignalSet::new(DatasetKind::Atmosphere, vec![signal]))
}

fn read_rows<R: BufRead>(reader: R, path: &Path) -> Result<Vec<(f64, f64)>, SignalError> {
    let mut rows = Vec::new();

    // First line is the header.
    for (number, line) in reader.lines().enumerate().skip(1) {
        let line = line.map_err(|e| SignalError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let parse_error = |message: &str| SignalError::Parse {
            path: path.to_path_buf(),
            line: number + 1,
            message: message.to_string(),
        };

        let mut parts = line.split(',');
        let day = parts
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| parse_error("day is not a number"))?;
        let temp = parts
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| parse_error("temperature is not a number"))?;

        rows.push((day, temp));
    }

    Ok(rows)
}

fn resample(rows: &[(f64, f64)]) -> Option<Signal> {
    let windows = (TOTAL_DAYS / RESAMPLE).min(rows.len() / RESAMPLE);
    if windows == 0 {
        return None;
    }

    let (days, temps): (Vec<f64>, Vec<f64>) = rows
        .chunks_exact(RESAMPLE)
        .take(windows)
        .map(|chunk| {
            let day = chunk.iter().map(|(d, _)| d).sum::<f64>() / RESAMPLE as f64;
            let temp = chunk.iter().map(|(_, t)| t).sum::<f64>() / RESAMPLE as f64;
            (day, temp)
        })
        .unzip();

    let mean_temp = temps.iter().sum::<f64>() / temps.len() as f64;
    if mean_temp == 0.0 {
        return None;
    }

    let keep = (KEPT_DAYS / RESAMPLE).min(windows);
    let timestamps = days[..keep].iter().map(|d| (d / 365.0) as f32).collect();
    let values = temps[..keep]
        .iter()
        .map(|t| (t / mean_temp) as f32)
        .collect();

    Some(Signal::new(values, timestamps))
}
