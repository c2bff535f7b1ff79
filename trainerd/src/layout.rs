use std::path::{Path, PathBuf};

use tokio::{fs, io};

use crate::codec::STANDARD_SUFFIX;

const TMP_DIR: &str = "tmp";
const INPUT_DIR: &str = "input";
const AUG_DIR: &str = "aug_64x64";
const UNAUG_DIR: &str = "unaug_64x64";
const NETWORK_DIR: &str = "network";
const OLD_NET: &str = "old.net";
const NEW_NET: &str = "adversarial.net";

/// On-disk working tree for one service instance.
///
/// All artifacts live under `<root>/tmp`: the canonical input image,
/// the augmented and un-augmented 64x64 variants, and the network
/// weight files. Directories are created if absent and never cleaned
/// between runs.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn tmp(&self) -> PathBuf {
        self.root.join(TMP_DIR)
    }

    pub fn input_dir(&self) -> PathBuf {
        self.tmp().join(INPUT_DIR)
    }

    pub fn aug_dir(&self) -> PathBuf {
        self.tmp().join(AUG_DIR)
    }

    pub fn unaug_dir(&self) -> PathBuf {
        self.tmp().join(UNAUG_DIR)
    }

    pub fn network_dir(&self) -> PathBuf {
        self.tmp().join(NETWORK_DIR)
    }

    /// Weights the trainer starts from.
    pub fn old_net(&self) -> PathBuf {
        self.network_dir().join(OLD_NET)
    }

    /// Weights the trainer leaves behind after a successful pass.
    pub fn new_net(&self) -> PathBuf {
        self.network_dir().join(NEW_NET)
    }

    /// The canonical input file every accepted image overwrites.
    pub fn input_file(&self) -> PathBuf {
        self.input_dir().join(format!("input{STANDARD_SUFFIX}"))
    }

    /// Destination for the `idx`-th rehydrated augmented image.
    pub fn aug_image(&self, idx: usize) -> PathBuf {
        self.aug_dir().join(format!("{idx}{STANDARD_SUFFIX}"))
    }

    /// Creates the four working directories. Idempotent.
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [
            self.input_dir(),
            self.aug_dir(),
            self.unaug_dir(),
            self.network_dir(),
        ] {
            fs::create_dir_all(dir).await?;
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
