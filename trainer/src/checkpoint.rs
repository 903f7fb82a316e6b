use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use candle_core::{Device, Tensor};
use candle_nn::VarMap;

use crate::error::TrainError;

/// Name of the scalar stored next to the model variables.
pub const SCORE_KEY: &str = "best_score";

/// A single safetensors file holding the best model and its score.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Overwrites the checkpoint. Written to a sibling file first so an
    /// interrupted save never leaves a truncated checkpoint behind.
    pub fn save(&self, varmap: &VarMap, best_score: f64) -> Result<(), TrainError> {
        let mut tensors: HashMap<String, Tensor> = {
            let vars = varmap.data().lock().unwrap_or_else(|e| e.into_inner());
            vars.iter()
                .map(|(name, var)| (name.clone(), var.as_tensor().clone()))
                .collect()
        };
        tensors.insert(SCORE_KEY.to_string(), Tensor::new(best_score, &Device::Cpu)?);

        let staging = self.path.with_extension("safetensors.tmp");
        candle_core::safetensors::save(&tensors, &staging)?;
        fs::rename(&staging, &self.path).map_err(|e| TrainError::io(&self.path, e))?;
        Ok(())
    }

    /// Restores variables into `varmap` and returns the stored score,
    /// or `None` when no checkpoint exists yet.
    pub fn load(&self, varmap: &mut VarMap) -> Result<Option<f64>, TrainError> {
        if !self.exists() {
            return Ok(None);
        }

        varmap.load(&self.path)?;

        let tensors = candle_core::safetensors::load(&self.path, &Device::Cpu)?;
        let score = tensors
            .get(SCORE_KEY)
            .ok_or_else(|| TrainError::MissingScore(self.path.clone()))?
            .to_scalar::<f64>()?;

        Ok(Some(score))
    }
}
