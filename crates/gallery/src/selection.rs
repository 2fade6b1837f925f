//! Transient set of catalog ids marked for a bulk action.

use showcase_core::ImageId;
use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::GalleryCatalog;

#[derive(Debug, Default, Clone)]
pub struct SelectionController {
    selected: BTreeSet<ImageId>,
}

impl SelectionController {
    /// Mark or unmark `id`. Ids missing from the catalog are ignored so the
    /// selection stays a subset of it. Returns whether the set changed.
    pub fn toggle(&mut self, catalog: &GalleryCatalog, id: ImageId, selected: bool) -> bool {
        let changed = if selected {
            catalog.contains(id) && self.selected.insert(id)
        } else {
            self.selected.remove(&id)
        };
        if changed {
            debug!(id, selected, total = self.selected.len(), "Selection toggled");
        }
        changed
    }

    /// Deselect everything when every catalog image is already selected,
    /// otherwise select exactly the catalog's current ids. Returns the new
    /// selection size.
    pub fn select_all(&mut self, catalog: &GalleryCatalog) -> usize {
        if self.selected.len() == catalog.len() {
            self.selected.clear();
        } else {
            self.selected = catalog.ids();
        }
        self.selected.len()
    }

    /// Forget ids that are no longer in the catalog.
    pub fn retain_existing(&mut self, catalog: &GalleryCatalog) {
        self.selected.retain(|id| catalog.contains(*id));
    }

    pub fn remove(&mut self, id: ImageId) -> bool {
        self.selected.remove(&id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.selected.contains(&id)
    }

    pub fn ids(&self) -> &BTreeSet<ImageId> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Bulk actions are offered only while something is selected.
    pub fn bulk_actions_enabled(&self) -> bool {
        !self.selected.is_empty()
    }

    /// True when the selection covers a non-empty catalog entirely.
    pub fn covers(&self, catalog: &GalleryCatalog) -> bool {
        !catalog.is_empty() && self.selected.len() == catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::StagingArea;
    use crate::test_support::{png, session};
    use showcase_storage::MemoryStore;
    use std::sync::Arc;

    async fn catalog_of(n: usize) -> (Arc<MemoryStore>, GalleryCatalog) {
        let store = Arc::new(MemoryStore::new());
        let admin = session(&store, true);
        let mut catalog = GalleryCatalog::open(store.clone(), 50);
        let staging = StagingArea::default();
        staging
            .stage((0..n).map(|i| png(&format!("{i}.png"))).collect())
            .await;
        catalog.commit_staged(&admin, &staging).unwrap();
        (store, catalog)
    }

    #[tokio::test]
    async fn test_select_all_then_deselect_all() {
        let (_, catalog) = catalog_of(5).await;
        let mut selection = SelectionController::default();

        assert_eq!(selection.select_all(&catalog), 5);
        assert!(selection.covers(&catalog));
        assert_eq!(selection.select_all(&catalog), 0);
        assert!(!selection.bulk_actions_enabled());
    }

    #[tokio::test]
    async fn test_partial_selection_select_all_selects_everything() {
        let (_, catalog) = catalog_of(4).await;
        let mut selection = SelectionController::default();
        let first = catalog.images()[0].id;
        selection.toggle(&catalog, first, true);

        assert_eq!(selection.select_all(&catalog), 4);
        assert_eq!(selection.ids(), &catalog.ids());
    }

    #[tokio::test]
    async fn test_toggle_ignores_unknown_ids() {
        let (_, catalog) = catalog_of(2).await;
        let mut selection = SelectionController::default();
        let id = catalog.images()[0].id;

        assert!(!selection.toggle(&catalog, -1, true));
        assert!(selection.toggle(&catalog, id, true));
        assert!(!selection.toggle(&catalog, id, true));
        assert!(selection.bulk_actions_enabled());
        assert!(selection.toggle(&catalog, id, false));
        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn test_select_all_is_a_snapshot() {
        let (store, mut catalog) = catalog_of(3).await;
        let admin = session(&store, true);
        let mut selection = SelectionController::default();
        selection.select_all(&catalog);

        let staging = StagingArea::new(catalog.max_id());
        staging.stage(vec![png("late.png")]).await;
        catalog.commit_staged(&admin, &staging).unwrap();

        assert_eq!(selection.len(), 3);
        assert!(!selection.covers(&catalog));
        // Not everything is selected any more, so select-all selects again.
        assert_eq!(selection.select_all(&catalog), 4);
    }

    #[tokio::test]
    async fn test_retain_existing_prunes_stale_ids() {
        let (_, catalog) = catalog_of(2).await;
        let mut selection = SelectionController::default();
        selection.select_all(&catalog);
        selection.retain_existing(&catalog);
        assert_eq!(selection.len(), 2);

        let empty = GalleryCatalog::open(Arc::new(MemoryStore::new()), 50);
        selection.retain_existing(&empty);
        assert!(selection.is_empty());
    }
}
