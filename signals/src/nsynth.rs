use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;

use crate::error::SignalError;
use crate::kind::DatasetKind;
use crate::signal::{Signal, SignalSet};
use crate::split::Split;

/// Instrument families kept, in label order.
pub const FAMILIES: [&str; 3] = ["flute", "keyboard", "vocal"];

/// The clip covers 1.0s to 1.1s of each 16kHz note.
const CLIP_START: usize = 16_000;
const CLIP_LEN: usize = 1_600;
const CLIP_SECONDS: f32 = 0.1;

const PITCH_TAG: &str = "-040-";
const SOURCE_TAG: &str = "_synthetic_";
const EXCLUDED_QUALITY: &str = "fast_decay";

#[derive(Debug, Deserialize)]
struct NoteMetadata {
    #[serde(default)]
    qualities_str: Vec<String>,
}

pub fn split_dir(root: &Path, split: Split) -> PathBuf {
    let name = match split {
        Split::Train => "nsynth-train",
        Split::Eval => "nsynth-valid",
        Split::Test => "nsynth-test",
    };
    root.join(name)
}

/// Synthetic notes at MIDI pitch 40 from three instrument families,
/// excluding fast-decaying notes. Labels index into [`FAMILIES`].
pub fn load(root: &Path, split: Split) -> Result<SignalSet, SignalError> {
    let dir = split_dir(root, split);
    let names = select_notes(&dir)?;
    log::info!("{} split has a total of {} notes", split, names.len());

    let timestamps = crate::linspace(0.0, CLIP_SECONDS, CLIP_LEN);
    let audio_dir = dir.join("audio");

    let signals = names
        .par_iter()
        .map(|(name, label)| {
            let path = audio_dir.join(format!("{}.wav", name));
            let values = read_clip(&path)?;
            Ok(Signal::new(values, timestamps.clone()).with_label(*label))
        })
        .collect::<Result<Vec<_>, SignalError>>()?;

    Ok(SignalSet::new(DatasetKind::NSynth, signals))
}

fn select_notes(dir: &Path) -> Result<Vec<(String, u32)>, SignalError> {
    let path = dir.join("examples.json");
    let file = File::open(&path).map_err(|e| SignalError::io(&path, e))?;

    // Sorted by note name.
    let metadata: BTreeMap<String, NoteMetadata> = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| SignalError::Json {
            path: path.clone(),
            source,
        })?;

    Ok(metadata
        .into_iter()
        .filter(|(name, _)| name.contains(SOURCE_TAG) && name.contains(PITCH_TAG))
        .filter(|(_, note)| !note.qualities_str.iter().any(|q| q == EXCLUDED_QUALITY))
        .filter_map(|(name, _)| {
            let family = name.split('_').next()?;
            let label = FAMILIES.iter().position(|f| *f == family)?;
            Some((name, label as u32))
        })
        .collect())
}

fn read_clip(path: &Path) -> Result<Vec<f32>, SignalError> {
    let wav_error = |source| SignalError::Wav {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = hound::WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()
                .map_err(wav_error)?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(wav_error)?,
    };

    let end = CLIP_START + CLIP_LEN;
    if samples.len() < end {
        return Err(SignalError::Truncated {
            path: path.to_path_buf(),
            needed: end,
            found: samples.len(),
        });
    }

    Ok(samples[CLIP_START..end].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_wav(path: &Path, samples: usize) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..samples {
            writer.write_sample((i % 100) as i16 * 100).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn fixture(split: Split, notes: &[(&str, &[&str])], samples: usize) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let dir = split_dir(root.path(), split);
        fs::create_dir_all(dir.join("audio")).unwrap();

        let metadata: serde_json::Map<String, serde_json::Value> = notes
            .iter()
            .map(|(name, qualities)| {
                (
                    name.to_string(),
                    serde_json::json!({ "qualities_str": qualities, "pitch": 40 }),
                )
            })
            .collect();
        fs::write(
            dir.join("examples.json"),
            serde_json::to_string(&metadata).unwrap(),
        )
        .unwrap();

        for (name, _) in notes {
            write_wav(&dir.join("audio").join(format!("{}.wav", name)), samples);
        }
        root
    }

    #[test]
    fn test_filters_and_labels() {
        let root = fixture(
            Split::Eval,
            &[
                ("vocal_synthetic_003-040-050", &[]),
                ("flute_synthetic_000-040-100", &["bright"]),
                ("flute_acoustic_002-040-100", &[]),
                ("keyboard_synthetic_001-041-100", &[]),
                ("keyboard_synthetic_007-040-025", &["fast_decay"]),
                ("organ_synthetic_001-040-100", &[]),
            ],
            CLIP_START + CLIP_LEN,
        );

        let set = load(root.path(), Split::Eval).unwrap();
        let labels: Vec<Option<u32>> = set.signals.iter().map(|s| s.label).collect();

        assert_eq!(labels, vec![Some(0), Some(2)]);
        assert_eq!(set.signal_len().unwrap(), CLIP_LEN);
        assert!((set.signals[0].timestamps[CLIP_LEN - 1] - CLIP_SECONDS).abs() < 1e-6);
    }

    #[test]
    fn test_clip_is_scaled_and_offset() {
        let root = fixture(
            Split::Train,
            &[("flute_synthetic_000-040-100", &[])],
            CLIP_START + CLIP_LEN + 10,
        );

        let set = load(root.path(), Split::Train).unwrap();
        let values = &set.signals[0].values;

        // Sample 16000 wrote (16000 % 100) * 100 = 0, sample 16001 wrote 100.
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 100.0 / 32768.0).abs() < 1e-7);
        assert!(values.iter().all(|v| v.abs() <= 1.0));
    }

    #[test]
    fn test_short_wav_is_an_error() {
        let root = fixture(Split::Test, &[("vocal_synthetic_001-040-100", &[])], 100);
        assert!(matches!(
            load(root.path(), Split::Test),
            Err(SignalError::Truncated { found: 100, .. })
        ));
    }

    #[test]
    fn test_missing_metadata() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(root.path(), Split::Train),
            Err(SignalError::Io { .. })
        ));
    }
}
