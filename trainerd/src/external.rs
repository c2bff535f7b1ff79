//! Collaborator seams for the external augmentation and training
//! routines. The orchestrator never spawns processes directly; it sees
//! only these two traits.

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use log::warn;
use tokio::process::Command;

use crate::error::{Result, ServiceErr};

/// Dataset augmentation routine, run once per accepted image.
///
/// Implementations fill `aug_dir` and `unaug_dir` with 64x64 variants
/// of the canonical input found under `input_dir`.
pub trait Augmenter: Send + Sync {
    fn augment(
        &self,
        input_dir: &Path,
        aug_dir: &Path,
        unaug_dir: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// External model trainer behind a narrow interface: one pass from the
/// old weights, new weights left under the save directory.
pub trait Trainer: Send + Sync {
    fn train(&self, old_net: &Path, save_dir: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Runs an external augmentation executable with the three working
/// directories as positional arguments.
#[derive(Debug, Clone)]
pub struct ScriptAugmenter {
    script: PathBuf,
}

impl ScriptAugmenter {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl Augmenter for ScriptAugmenter {
    async fn augment(&self, input_dir: &Path, aug_dir: &Path, unaug_dir: &Path) -> Result<()> {
        let status = Command::new(&self.script)
            .arg(input_dir)
            .arg(aug_dir)
            .arg(unaug_dir)
            .status()
            .await?;

        // The augmentation contract predates status reporting: a failed
        // run leaves the directories short, but is not fatal.
        if !status.success() {
            warn!("augmentation routine exited with {status}");
        }

        Ok(())
    }
}

/// Invokes the external training script as a subprocess with
/// `--network <old weights> --save <weights dir>`.
///
/// The call blocks until the script exits; there is no timeout and no
/// retry. Partial output from a failed run stays on disk.
#[derive(Debug, Clone)]
pub struct ScriptTrainer {
    script: PathBuf,
}

impl ScriptTrainer {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl Trainer for ScriptTrainer {
    async fn train(&self, old_net: &Path, save_dir: &Path) -> Result<()> {
        let status = Command::new(&self.script)
            .arg("--network")
            .arg(old_net)
            .arg("--save")
            .arg(save_dir)
            .status()
            .await?;

        if !status.success() {
            return Err(ServiceErr::TrainingFailed {
                status: status.code(),
            });
        }

        Ok(())
    }
}
