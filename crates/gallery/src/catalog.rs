//! Persisted gallery catalog. Every mutation requires an admin session.

use chrono::Utc;
use showcase_admin::AdminSession;
use showcase_core::{GalleryImage, ImageId, ShowcaseResult};
use showcase_storage::{keys, SharedStore, StoreExt};
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::selection::SelectionController;
use crate::staging::StagingArea;

/// Newest-first list of committed gallery images.
pub struct GalleryCatalog {
    store: SharedStore,
    images: Vec<GalleryImage>,
    capacity: usize,
}

impl GalleryCatalog {
    pub fn open(store: SharedStore, capacity: usize) -> Self {
        let mut catalog = Self {
            store,
            images: Vec::new(),
            capacity: capacity.max(1),
        };
        catalog.reload();
        catalog
    }

    /// Re-read the catalog from the store.
    pub fn reload(&mut self) {
        let mut images: Vec<GalleryImage> = self.store.get_list(keys::GALLERY_IMAGES);
        if images.len() > self.capacity {
            warn!(
                stored = images.len(),
                capacity = self.capacity,
                "Stored gallery exceeds capacity, truncating"
            );
            images.truncate(self.capacity);
        }
        self.images = images;
    }

    /// Move every staged upload to the head of the catalog in one write.
    ///
    /// The last staged entry ends up first. Entries whose id is already in
    /// the catalog are dropped. Returns how many images were inserted; when
    /// that is zero nothing is written.
    pub fn commit_staged(
        &mut self,
        session: &AdminSession,
        staging: &StagingArea,
    ) -> ShowcaseResult<usize> {
        session.require_admin()?;

        let staged = staging.drain();
        if staged.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut images: Vec<GalleryImage> = staged
            .into_iter()
            .rev()
            .filter(|s| !self.contains(s.id))
            .map(|s| GalleryImage {
                id: s.id,
                src: s.src,
                timestamp: now,
            })
            .collect();
        let count = images.len();
        if count == 0 {
            return Ok(0);
        }
        images.append(&mut self.images);
        images.truncate(self.capacity);
        self.images = images;
        self.persist();

        info!(
            committed = count,
            total = self.images.len(),
            admin = session.current_admin().unwrap_or("-"),
            "Staged uploads committed"
        );
        Ok(count)
    }

    /// Delete one image and drop it from the selection.
    /// Returns whether the image existed.
    pub fn remove(
        &mut self,
        session: &AdminSession,
        selection: &mut SelectionController,
        id: ImageId,
    ) -> ShowcaseResult<bool> {
        session.require_admin()?;

        selection.remove(id);
        let before = self.images.len();
        self.images.retain(|img| img.id != id);
        let removed = self.images.len() != before;
        if removed {
            self.persist();
            info!(id, "Gallery image removed");
        }
        Ok(removed)
    }

    /// Delete every image in `ids` with a single write. Returns how many
    /// images were actually removed.
    pub fn remove_many(
        &mut self,
        session: &AdminSession,
        selection: &mut SelectionController,
        ids: &BTreeSet<ImageId>,
    ) -> ShowcaseResult<usize> {
        session.require_admin()?;

        for id in ids {
            selection.remove(*id);
        }
        let before = self.images.len();
        self.images.retain(|img| !ids.contains(&img.id));
        let removed = before - self.images.len();
        if removed > 0 {
            self.persist();
            info!(removed, "Gallery images removed");
        }
        Ok(removed)
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn get(&self, id: ImageId) -> Option<&GalleryImage> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.images.iter().any(|img| img.id == id)
    }

    pub fn ids(&self) -> BTreeSet<ImageId> {
        self.images.iter().map(|img| img.id).collect()
    }

    /// Largest id in the catalog, or 0 when empty.
    pub fn max_id(&self) -> ImageId {
        self.images.iter().map(|img| img.id).max().unwrap_or(0)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn persist(&self) {
        self.store.set(keys::GALLERY_IMAGES, &self.images);
    }
}
