use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::error::{ReplicatorError, Result};
use super::trained::TrainedModel;

/// On-disk envelope: the model plus a SHA-256 checksum of its JSON form
#[derive(Debug, Serialize, Deserialize)]
struct PersistedModel {
    checksum: String,
    model: TrainedModel,
}

/// Get default model path
pub fn default_model_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("replicator") // App name
        .join("model_v1.json")
}

/// Where a freshly trained model should be written: an explicit path wins,
/// otherwise `default_model_path()` when saving was requested, otherwise nowhere.
pub fn output_model_path(explicit: Option<&str>, save_requested: bool) -> Option<PathBuf> {
    match explicit.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => Some(PathBuf::from(path)),
        None if save_requested => Some(default_model_path()),
        None => None,
    }
}

/// Hex SHA-256 of the model's serialized form
pub fn model_checksum(model: &TrainedModel) -> Result<String> {
    let bytes = serde_json::to_vec(model)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Save model to disk
pub fn save_model(model: &TrainedModel, path: &Path) -> Result<()> {
    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let persisted = PersistedModel {
        checksum: model_checksum(model)?,
        model: model.clone(),
    };
    let json = serde_json::to_vec_pretty(&persisted)?;
    fs::write(path, json)?;

    log::info!("Saved model {} to {}", model.metadata.id, path.display());
    Ok(())
}

/// Load model from disk with checksum and shape validation
pub fn load_model(path: &Path) -> Result<TrainedModel> {
    if !path.exists() {
        return Err(ReplicatorError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Model file not found",
        )));
    }

    let data = fs::read(path)?;
    let persisted: PersistedModel = serde_json::from_slice(&data)?;

    let actual = model_checksum(&persisted.model)?;
    if actual != persisted.checksum {
        return Err(ReplicatorError::CorruptModel(format!(
            "checksum mismatch: expected {}, got {}",
            persisted.checksum, actual
        )));
    }

    persisted.model.validate()?;

    log::info!(
        "Loaded model {} ({}) from {}",
        persisted.model.metadata.id,
        persisted.model.topology(),
        path.display()
    );
    Ok(persisted.model)
}
