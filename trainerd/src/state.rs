use std::{collections::BTreeMap, io, path::Path};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{Result, ServiceErr};

/// Key holding the trained network weights.
pub const NETWORK_KEY: &str = "network";

/// Key holding the ordered augmented image blobs.
pub const AUG_IMAGES_KEY: &str = "aug_images";

/// A value held in the persisted key/value blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateValue {
    Bytes(Vec<u8>),
    Blobs(Vec<Vec<u8>>),
}

/// The persisted key/value state blob.
///
/// Loaded once at startup and written back after every successful
/// training cycle; between those points the working tree on disk is
/// the only other copy of its contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateStore {
    entries: BTreeMap<String, StateValue>,
}

impl StateStore {
    /// The trained network weights, if a training pass has completed.
    pub fn network(&self) -> Option<&[u8]> {
        match self.entries.get(NETWORK_KEY) {
            Some(StateValue::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    pub fn set_network(&mut self, bytes: Vec<u8>) {
        self.entries
            .insert(NETWORK_KEY.to_string(), StateValue::Bytes(bytes));
    }

    /// The augmented image blobs from the most recent training pass.
    pub fn aug_images(&self) -> Option<&[Vec<u8>]> {
        match self.entries.get(AUG_IMAGES_KEY) {
            Some(StateValue::Blobs(blobs)) => Some(blobs),
            _ => None,
        }
    }

    pub fn set_aug_images(&mut self, blobs: Vec<Vec<u8>>) {
        self.entries
            .insert(AUG_IMAGES_KEY.to_string(), StateValue::Blobs(blobs));
    }

    /// Loads the blob from `path`. A missing file is a fresh store; an
    /// unparsable one is a configuration error.
    pub async fn load(path: &Path) -> Result<Self> {
        match fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceErr::InvalidConfig(format!("state blob {}: {e}", path.display()))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the blob to `path`, replacing any previous one.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec(self).map_err(io::Error::other)?;
        fs::write(path, bytes).await?;
        Ok(())
    }
}
