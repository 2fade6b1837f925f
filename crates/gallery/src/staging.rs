//! Upload staging: files are decoded into `data:` URLs concurrently and
//! held in memory until an admin commits them to the catalog.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use chrono::Utc;
use parking_lot::Mutex;
use showcase_core::ImageId;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// A file picked or dropped by the admin.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// A decoded, not yet committed upload. Also serves as its preview entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    pub id: ImageId,
    pub name: String,
    pub src: String,
}

/// Issues time-derived ids that never repeat or go backwards.
#[derive(Debug)]
struct IdClock {
    last: AtomicI64,
}

impl IdClock {
    fn new(floor: ImageId) -> Self {
        Self {
            last: AtomicI64::new(floor),
        }
    }

    fn issue(&self, candidate: ImageId) -> ImageId {
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let next = candidate.max(current.saturating_add(1));
            match self
                .last
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }

    fn observe(&self, id: ImageId) {
        self.last.fetch_max(id, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct StagingInner {
    /// Bumped by `reset` so decodes from a discarded batch are dropped.
    generation: u64,
    entries: Vec<StagedImage>,
}

/// Shared handle to the staging list. Clones refer to the same list.
#[derive(Debug, Clone)]
pub struct StagingArea {
    inner: Arc<Mutex<StagingInner>>,
    clock: Arc<IdClock>,
}

impl Default for StagingArea {
    fn default() -> Self {
        Self::new(0)
    }
}

impl StagingArea {
    /// `floor` is the largest image id already in use.
    pub fn new(floor: ImageId) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StagingInner::default())),
            clock: Arc::new(IdClock::new(floor)),
        }
    }

    /// Keep future ids above `id`.
    pub fn observe_id(&self, id: ImageId) {
        self.clock.observe(id);
    }

    /// Start decoding every image-typed file concurrently. Non-image files
    /// are skipped. Entries land in the staging list as their decodes finish
    /// while the returned batch is driven.
    pub fn begin(&self, files: Vec<UploadFile>) -> StagingBatch {
        let generation = self.inner.lock().generation;
        let base = Utc::now().timestamp_millis();

        let mut decodes = JoinSet::new();
        for (index, file) in files.into_iter().enumerate() {
            if !file.is_image() {
                debug!(file = %file.name, content_type = %file.content_type, "Skipping non-image upload");
                continue;
            }
            let id = self.clock.issue(base + index as i64);
            decodes.spawn_blocking(move || decode(id, file));
        }

        StagingBatch {
            area: self.clone(),
            generation,
            decodes,
        }
    }

    /// Decode and stage `files`, returning how many entries were appended.
    pub async fn stage(&self, files: Vec<UploadFile>) -> usize {
        self.begin(files).finish().await
    }

    /// Drop one staged entry. Returns whether it was present.
    pub fn unstage(&self, id: ImageId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|e| e.id != id);
        inner.entries.len() != before
    }

    /// Discard everything staged and ignore decodes still in flight.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        if !inner.entries.is_empty() {
            info!(discarded = inner.entries.len(), "Staged uploads discarded");
        }
        inner.entries.clear();
    }

    /// Take every staged entry, leaving the list empty. Decodes still in
    /// flight keep landing in the (now empty) list.
    pub fn drain(&self) -> Vec<StagedImage> {
        std::mem::take(&mut self.inner.lock().entries)
    }

    /// Snapshot of the staged entries in arrival order.
    pub fn entries(&self) -> Vec<StagedImage> {
        self.inner.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

/// Decodes started by [`StagingArea::begin`].
pub struct StagingBatch {
    area: StagingArea,
    generation: u64,
    decodes: JoinSet<Option<StagedImage>>,
}

impl StagingBatch {
    /// Decodes still outstanding.
    pub fn pending(&self) -> usize {
        self.decodes.len()
    }

    /// Append each decode to the staging list in completion order. Results
    /// arriving after a `reset` are dropped. Returns how many were appended.
    pub async fn finish(mut self) -> usize {
        let mut appended = 0;
        while let Some(joined) = self.decodes.join_next().await {
            let staged = match joined {
                Ok(Some(staged)) => staged,
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "Image decode task failed");
                    continue;
                }
            };
            let mut inner = self.area.inner.lock();
            if inner.generation != self.generation {
                debug!(id = staged.id, "Dropping decode from a discarded batch");
                continue;
            }
            debug!(id = staged.id, file = %staged.name, "Upload staged");
            inner.entries.push(staged);
            appended += 1;
        }
        appended
    }
}

fn decode(id: ImageId, file: UploadFile) -> Option<StagedImage> {
    if file.data.is_empty() {
        warn!(file = %file.name, "Upload is empty, skipping");
        return None;
    }
    let src = format!(
        "data:{};base64,{}",
        file.content_type,
        STANDARD.encode(&file.data)
    );
    Some(StagedImage {
        id,
        name: file.name,
        src,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::png;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_stage_filters_non_images() {
        let staging = StagingArea::default();
        let files = vec![
            png("a.png"),
            UploadFile::new("notes.txt", "text/plain", Bytes::from_static(b"hello")),
            UploadFile::new("b.jpg", "image/jpeg", Bytes::from_static(b"\xff\xd8\xff")),
        ];
        assert_eq!(staging.stage(files).await, 2);

        let entries = staging.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.src.starts_with("data:image/")));
        let jpg = entries.iter().find(|e| e.name == "b.jpg").unwrap();
        assert_eq!(jpg.src, "data:image/jpeg;base64,/9j/");
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_above_floor() {
        let floor = Utc::now().timestamp_millis() + 1_000_000;
        let staging = StagingArea::new(floor);
        staging
            .stage((0..10).map(|i| png(&format!("{i}.png"))).collect())
            .await;
        staging.stage(vec![png("again.png")]).await;

        let ids: HashSet<ImageId> = staging.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 11);
        assert!(ids.iter().all(|id| *id > floor));
    }

    #[test]
    fn test_id_clock_saturates_at_max() {
        let clock = IdClock::new(ImageId::MAX);
        assert_eq!(clock.issue(5), ImageId::MAX);
        assert_eq!(clock.issue(ImageId::MAX), ImageId::MAX);
    }

    #[tokio::test]
    async fn test_staging_survives_floor_at_max_id() {
        let staging = StagingArea::new(ImageId::MAX);
        assert_eq!(staging.stage(vec![png("late.png")]).await, 1);
        assert_eq!(staging.entries()[0].id, ImageId::MAX);
    }

    #[tokio::test]
    async fn test_empty_upload_is_skipped() {
        let staging = StagingArea::default();
        let appended = staging
            .stage(vec![UploadFile::new("empty.png", "image/png", Bytes::new()), png("ok.png")])
            .await;
        assert_eq!(appended, 1);
        assert_eq!(staging.entries()[0].name, "ok.png");
    }

    #[tokio::test]
    async fn test_unstage_and_reset() {
        let staging = StagingArea::default();
        staging.stage(vec![png("a.png"), png("b.png")]).await;
        let first = staging.entries()[0].id;

        assert!(staging.unstage(first));
        assert!(!staging.unstage(first));
        assert_eq!(staging.len(), 1);

        staging.reset();
        assert!(staging.is_empty());
    }

    #[tokio::test]
    async fn test_reset_discards_late_decodes() {
        let staging = StagingArea::default();
        let batch = staging.begin((0..5).map(|i| png(&format!("{i}.png"))).collect());
        assert_eq!(batch.pending(), 5);

        staging.reset();
        assert_eq!(batch.finish().await, 0);
        assert!(staging.is_empty());

        // A fresh batch after the reset stages normally.
        assert_eq!(staging.stage(vec![png("next.png")]).await, 1);
    }

    #[tokio::test]
    async fn test_drain_empties_list() {
        let staging = StagingArea::default();
        staging.stage(vec![png("a.png")]).await;
        let drained = staging.drain();
        assert_eq!(drained.len(), 1);
        assert!(staging.is_empty());
    }
}
