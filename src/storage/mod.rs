//! Persistence for the trained model artifact.
//!
//! The artifact is single-slot: retraining overwrites "the current model"
//! with no versioning. Writes stage to a temporary file and rename into
//! place so a failed retrain never corrupts the previously usable artifact.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::{EngineError, Result};
use crate::forecast::SpendingModel;
use crate::utils::{app_data_dir, ensure_dir};

const MODEL_FILE: &str = "model.json";
const TMP_SUFFIX: &str = "tmp";

/// Stores the trained spending model as a JSON file under the engine's
/// data directory.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    /// Opens a store rooted at `root`, or at the default data directory
    /// (`FINMATE_HOME` override, else `~/.finmate_core`).
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(MODEL_FILE),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Atomically replaces the stored model.
    pub fn save(&self, model: &SpendingModel) -> Result<()> {
        let json = serde_json::to_string_pretty(model)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "Saved spending model artifact");
        Ok(())
    }

    /// Loads the current model. `ModelUnavailable` when nothing has been
    /// trained yet; callers fall back to the linear forecast or train first.
    pub fn load(&self) -> Result<SpendingModel> {
        if !self.path.exists() {
            return Err(EngineError::ModelUnavailable);
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use crate::transaction::Transaction;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn trained_model() -> SpendingModel {
        let rules = RuleSet::default();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let batch = vec![
            Transaction::new(date, "Swiggy Order", 300.0).unwrap(),
            Transaction::new(date.succ_opt().unwrap(), "Zomato", 150.0).unwrap(),
            Transaction::new(date.succ_opt().unwrap(), "Uber Trip", 90.0).unwrap(),
        ];
        SpendingModel::train(&rules.categorize_all(batch)).expect("train")
    }

    #[test]
    fn load_without_artifact_is_model_unavailable() {
        let temp = TempDir::new().expect("temp dir");
        let store = ModelStore::new(Some(temp.path().to_path_buf())).expect("store");
        assert!(matches!(store.load(), Err(EngineError::ModelUnavailable)));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().expect("temp dir");
        let store = ModelStore::new(Some(temp.path().to_path_buf())).expect("store");
        let model = trained_model();
        store.save(&model).expect("save model");
        let loaded = store.load().expect("load model");
        assert_eq!(loaded, model);
    }

    #[test]
    fn retrain_overwrites_the_single_slot() {
        let temp = TempDir::new().expect("temp dir");
        let store = ModelStore::new(Some(temp.path().to_path_buf())).expect("store");
        let first = trained_model();
        store.save(&first).expect("first save");
        let second = trained_model();
        store.save(&second).expect("second save");
        let loaded = store.load().expect("load model");
        assert_eq!(loaded.trained_at, second.trained_at);
    }

    #[test]
    fn stale_tmp_file_does_not_mask_the_artifact() {
        // Simulates a retrain that died mid-write: the staged tmp file is
        // garbage but the previously saved artifact still loads.
        let temp = TempDir::new().expect("temp dir");
        let store = ModelStore::new(Some(temp.path().to_path_buf())).expect("store");
        let model = trained_model();
        store.save(&model).expect("save model");

        fs::write(tmp_path(store.path()), "{ not json").expect("write tmp");
        let loaded = store.load().expect("artifact still valid");
        assert_eq!(loaded, model);
    }
}
