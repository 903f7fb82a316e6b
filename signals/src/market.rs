use std::fs;
use std::path::Path;

use crate::error::SignalError;
use crate::kind::DatasetKind;
use crate::signal::{Signal, SignalSet};

pub const FILE_NAME: &str = "market.txt";

/// Points kept from the start of the series.
pub const MAX_POINTS: usize = 6300;

/// Reads one index value per line as a single normalised trajectory.
///
/// Lines with missing values (`N`, `NaN`) or anything unparseable are skipped.
/// Time is `1..=n` scaled by `n`, values are scaled by their maximum.
pub fn load(root: &Path) -> Result<SignalSet, SignalError> {
    let path = root.join(FILE_NAME);
    let text = fs::read_to_string(&path).map_err(|e| SignalError::io(&path, e))?;

    let (values, skipped) = parse(&text);
    if skipped > 0 {
        log::debug!("Skipped {} unusable lines in {}", skipped, path.display());
    }

    let signal = normalise(values).ok_or_else(|| SignalError::Empty(path.display().to_string()))?;
    log::info!("Loaded market index with {} points", signal.len());

    Ok(SignalSet::new(DatasetKind::MarketIndex, vec![signal]))
}

fn parse(text: &str) -> (Vec<f64>, usize) {
    let mut values = Vec::new();
    let mut skipped = 0;

    for line in text.lines() {
        if line.contains('N') {
            skipped += 1;
            continue;
        }
        match line.trim().parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) => skipped += 1,
        }
    }

    (values, skipped)
}

fn normalise(values: Vec<f64>) -> Option<Signal> {
    let count = values.len();
    let max_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if count == 0 || max_value == 0.0 {
        return None;
    }

    let keep = count.min(MAX_POINTS);
    let timestamps = (1..=keep).map(|i| (i as f64 / count as f64) as f32).collect();
    let values = values[..keep]
        .iter()
        .map(|v| (v / max_value) as f32)
        .collect();

    Some(Signal::new(values, timestamps))
}
