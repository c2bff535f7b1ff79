use std::path::Path;

use log::{info, warn};
use tokio::fs;

use crate::{
    codec::{ImageCodec, STANDARD_SUFFIX},
    error::{Result, ServiceErr},
    external::{Augmenter, Trainer},
    layout::Layout,
    state::StateStore,
};

/// Sequences the per-image pipeline: intake, augmentation, training,
/// state gathering. One instance per service process.
///
/// Every step is synchronous with respect to the call: a hung trainer
/// blocks the current call until its process exits. There is no
/// rollback; a failure leaves whatever the previous steps wrote.
pub struct Orchestrator<C, A, T> {
    layout: Layout,
    codec: C,
    augmenter: A,
    trainer: T,
}

impl<C, A, T> Orchestrator<C, A, T>
where
    C: ImageCodec,
    A: Augmenter,
    T: Trainer,
{
    pub fn new(layout: Layout, codec: C, augmenter: A, trainer: T) -> Self {
        Self {
            layout,
            codec,
            augmenter,
            trainer,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Rebuilds the working tree from the persisted store.
    ///
    /// Creates the working directories (idempotent), writes each stored
    /// augmented image back to disk by index, and writes the stored
    /// network weights (or an empty file) to the old-weights path.
    /// Stored blobs are written verbatim so a subsequent gather
    /// reproduces them byte for byte.
    pub async fn init_state(&self, store: &StateStore) -> Result<()> {
        self.layout.ensure_dirs().await?;

        if let Some(blobs) = store.aug_images() {
            for (idx, blob) in blobs.iter().enumerate() {
                self.codec
                    .validate(blob)
                    .map_err(|e| ServiceErr::InvalidImage(e.to_string()))?;
                fs::write(self.layout.aug_image(idx), blob).await?;
            }
            info!("rehydrated {} augmented images", blobs.len());
        }

        let network = store.network().unwrap_or_default();
        fs::write(self.layout.old_net(), network).await?;

        Ok(())
    }

    /// Handles one `acceptImage` call end to end.
    ///
    /// Validates and re-encodes the image, overwrites the canonical
    /// input file, runs augmentation and training, then regathers the
    /// store. On `TrainingFailed` the store is left untouched.
    pub async fn accept_image(&self, store: &mut StateStore, image: Option<&[u8]>) -> Result<()> {
        let Some(bytes) = image else {
            warn!("acceptImage called without an image body");
            return Err(ServiceErr::MissingImage);
        };

        // Whatever the codec reports, a verification failure surfaces
        // uniformly as an invalid image.
        let standardized = self.codec.transcode(bytes).map_err(|e| {
            warn!("image failed verification: {e}");
            ServiceErr::InvalidImage(e.to_string())
        })?;

        fs::write(self.layout.input_file(), &standardized).await?;

        self.augmenter
            .augment(
                &self.layout.input_dir(),
                &self.layout.aug_dir(),
                &self.layout.unaug_dir(),
            )
            .await?;

        self.trainer
            .train(&self.layout.old_net(), &self.layout.network_dir())
            .await?;

        self.gather_state(store).await
    }

    /// Rebuilds the persisted store from the working tree.
    ///
    /// Runs only after a successful training pass: reads the new
    /// weights into `network` and replaces `aug_images` with the full
    /// current contents of the augmented-images directory.
    pub async fn gather_state(&self, store: &mut StateStore) -> Result<()> {
        let network = fs::read(self.layout.new_net()).await?;
        store.set_network(network);

        let mut blobs = Vec::new();
        collect_standard_images(&self.layout.aug_dir(), &mut blobs).await?;
        info!("gathered {} augmented images", blobs.len());
        store.set_aug_images(blobs);

        Ok(())
    }
}

/// Walks `dir` recursively in lexicographic order, appending the bytes
/// of every standard-format image file. The order is pinned so the
/// rebuilt state does not depend on filesystem iteration order.
async fn collect_standard_images(dir: &Path, out: &mut Vec<Vec<u8>>) -> Result<()> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        entries.push(entry.path());
    }
    entries.sort();

    for path in entries {
        if path.is_dir() {
            Box::pin(collect_standard_images(&path, out)).await?;
        } else if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains(STANDARD_SUFFIX))
        {
            out.push(fs::read(&path).await?);
        }
    }

    Ok(())
}
