//! Single and bulk deletion behind one confirm/cancel step.
//!
//! ```text
//! Idle --request(Some(id))--------------> PendingSingle(id)
//! Idle --request(None), selection != {}--> PendingBulk(snapshot)
//! Pending* --cancel------------------------> Idle   (no mutation)
//! PendingSingle(id) --confirm--------------> Idle   (remove id)
//! PendingBulk(set) --confirm---------------> Idle   (remove set, clear selection)
//! ```

use showcase_admin::AdminSession;
use showcase_core::{ImageId, ShowcaseResult};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::catalog::GalleryCatalog;
use crate::selection::SelectionController;

// ---------------------------------------------------------------------------
// Pending request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDeletion {
    Single(ImageId),
    /// Snapshot of the selection taken when the request was made.
    Bulk(BTreeSet<ImageId>),
}

impl PendingDeletion {
    /// Number of images the request would delete.
    pub fn count(&self) -> usize {
        match self {
            PendingDeletion::Single(_) => 1,
            PendingDeletion::Bulk(ids) => ids.len(),
        }
    }

    /// Text for the confirmation dialog.
    pub fn prompt(&self) -> ConfirmationPrompt {
        match self {
            PendingDeletion::Single(_) => ConfirmationPrompt {
                title: "Delete Image?".to_string(),
                message: "Are you sure you want to delete this image? This action cannot be undone."
                    .to_string(),
            },
            PendingDeletion::Bulk(ids) => {
                let n = ids.len();
                let s = if n == 1 { "" } else { "s" };
                ConfirmationPrompt {
                    title: format!("Delete {n} Image{s}?"),
                    message: format!(
                        "Are you sure you want to delete {n} selected image{s}? This action cannot be undone."
                    ),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub title: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// `confirm` was called with nothing pending.
    Nothing,
    Single { id: ImageId, removed: bool },
    Bulk { requested: usize, removed: usize },
}

impl DeletionOutcome {
    pub fn removed(&self) -> usize {
        match self {
            DeletionOutcome::Nothing => 0,
            DeletionOutcome::Single { removed, .. } => usize::from(*removed),
            DeletionOutcome::Bulk { removed, .. } => *removed,
        }
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Holds at most one outstanding delete request. Never persisted.
#[derive(Debug, Default)]
pub struct DeletionWorkflow {
    pending: Option<PendingDeletion>,
}

impl DeletionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to delete `target`, or the current selection when `target` is
    /// `None`. A new request replaces any pending one. A bulk request with an
    /// empty selection changes nothing.
    pub fn request_delete(
        &mut self,
        target: Option<ImageId>,
        selection: &SelectionController,
    ) -> Option<&PendingDeletion> {
        let request = match target {
            Some(id) => PendingDeletion::Single(id),
            None if selection.is_empty() => {
                debug!("Bulk delete requested with empty selection, ignoring");
                return self.pending.as_ref();
            }
            None => PendingDeletion::Bulk(selection.ids().clone()),
        };
        debug!(count = request.count(), "Deletion requested");
        self.pending = Some(request);
        self.pending.as_ref()
    }

    /// Drop the pending request without touching the catalog.
    /// Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Carry out the pending request and return to idle.
    ///
    /// The request is consumed even when the catalog refuses the mutation.
    pub fn confirm(
        &mut self,
        session: &AdminSession,
        catalog: &mut GalleryCatalog,
        selection: &mut SelectionController,
    ) -> ShowcaseResult<DeletionOutcome> {
        let Some(pending) = self.pending.take() else {
            return Ok(DeletionOutcome::Nothing);
        };

        let outcome = match pending {
            PendingDeletion::Single(id) => {
                let removed = catalog.remove(session, selection, id)?;
                DeletionOutcome::Single { id, removed }
            }
            PendingDeletion::Bulk(ids) => {
                let removed = catalog.remove_many(session, selection, &ids)?;
                selection.clear();
                DeletionOutcome::Bulk {
                    requested: ids.len(),
                    removed,
                }
            }
        };
        info!(removed = outcome.removed(), "Deletion confirmed");
        Ok(outcome)
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Prompt for the pending request, if any.
    pub fn prompt(&self) -> Option<ConfirmationPrompt> {
        self.pending.as_ref().map(PendingDeletion::prompt)
    }

    /// Drop a pending single deletion whose image no longer exists.
    pub fn retain_existing(&mut self, catalog: &GalleryCatalog) {
        if let Some(PendingDeletion::Single(id)) = self.pending {
            if !catalog.contains(id) {
                self.pending = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::StagingArea;
    use crate::test_support::{png, session};
    use showcase_core::ShowcaseError;
    use showcase_storage::MemoryStore;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryStore>,
        admin: AdminSession,
        catalog: GalleryCatalog,
        selection: SelectionController,
        workflow: DeletionWorkflow,
        ids: Vec<ImageId>,
    }

    async fn fixture(n: usize) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let admin = session(&store, true);
        let mut catalog = GalleryCatalog::open(store.clone(), 50);
        let staging = StagingArea::default();
        staging
            .stage((0..n).map(|i| png(&format!("{i}.png"))).collect())
            .await;
        catalog.commit_staged(&admin, &staging).unwrap();
        let ids = catalog.images().iter().map(|i| i.id).collect();
        Fixture {
            store,
            admin,
            catalog,
            selection: SelectionController::default(),
            workflow: DeletionWorkflow::new(),
            ids,
        }
    }

    #[tokio::test]
    async fn test_single_delete_confirm() {
        let mut f = fixture(4).await;
        let target = f.ids[2];
        f.selection.toggle(&f.catalog, target, true);
        f.selection.toggle(&f.catalog, f.ids[0], true);

        let pending = f.workflow.request_delete(Some(target), &f.selection).cloned();
        assert_eq!(pending, Some(PendingDeletion::Single(target)));

        let outcome = f
            .workflow
            .confirm(&f.admin, &mut f.catalog, &mut f.selection)
            .unwrap();
        assert_eq!(outcome, DeletionOutcome::Single { id: target, removed: true });
        assert!(f.workflow.is_idle());
        assert_eq!(f.catalog.len(), 3);
        assert!(!f.catalog.contains(target));
        assert!(!f.selection.contains(target));
        assert!(f.selection.contains(f.ids[0]));
    }

    #[tokio::test]
    async fn test_bulk_delete_confirm_single_write() {
        let mut f = fixture(5).await;
        for id in &f.ids[..3] {
            f.selection.toggle(&f.catalog, *id, true);
        }
        let pending = f.workflow.request_delete(None, &f.selection).cloned();
        assert_eq!(
            pending,
            Some(PendingDeletion::Bulk(f.ids[..3].iter().copied().collect()))
        );

        let writes = f.store.write_count();
        let outcome = f
            .workflow
            .confirm(&f.admin, &mut f.catalog, &mut f.selection)
            .unwrap();
        assert_eq!(outcome, DeletionOutcome::Bulk { requested: 3, removed: 3 });
        assert_eq!(f.store.write_count(), writes + 1);
        assert_eq!(f.catalog.ids(), f.ids[3..].iter().copied().collect());
        assert!(f.selection.is_empty());
        assert!(f.workflow.is_idle());
    }

    #[tokio::test]
    async fn test_bulk_request_with_empty_selection_stays_idle() {
        let mut f = fixture(2).await;
        assert!(f.workflow.request_delete(None, &f.selection).is_none());
        assert!(f.workflow.is_idle());
    }

    #[tokio::test]
    async fn test_cancel_leaves_catalog_untouched() {
        let mut f = fixture(2).await;
        f.workflow.request_delete(Some(f.ids[0]), &f.selection);
        let writes = f.store.write_count();
        assert!(f.workflow.cancel());
        assert!(!f.workflow.cancel());
        assert_eq!(f.catalog.len(), 2);
        assert_eq!(f.store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_confirm_without_pending_is_noop() {
        let mut f = fixture(1).await;
        let outcome = f
            .workflow
            .confirm(&f.admin, &mut f.catalog, &mut f.selection)
            .unwrap();
        assert_eq!(outcome, DeletionOutcome::Nothing);
        assert_eq!(f.catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_new_request_replaces_pending() {
        let mut f = fixture(3).await;
        f.selection.select_all(&f.catalog);
        f.workflow.request_delete(None, &f.selection);
        f.workflow.request_delete(Some(f.ids[1]), &f.selection);
        assert_eq!(f.workflow.pending(), Some(&PendingDeletion::Single(f.ids[1])));

        f.workflow
            .confirm(&f.admin, &mut f.catalog, &mut f.selection)
            .unwrap();
        assert_eq!(f.catalog.len(), 2);
        // Single deletion only drops the removed id from the selection.
        assert_eq!(f.selection.len(), 2);
    }

    #[tokio::test]
    async fn test_confirm_denied_consumes_request() {
        let mut f = fixture(2).await;
        f.workflow.request_delete(Some(f.ids[0]), &f.selection);
        f.admin.logout();

        let err = f
            .workflow
            .confirm(&f.admin, &mut f.catalog, &mut f.selection)
            .unwrap_err();
        assert!(matches!(err, ShowcaseError::Unauthorized(_)));
        assert!(f.workflow.is_idle());
        assert_eq!(f.catalog.len(), 2);
    }

    #[test]
    fn test_prompts() {
        let single = PendingDeletion::Single(1).prompt();
        assert_eq!(single.title, "Delete Image?");

        let one = PendingDeletion::Bulk([1].into_iter().collect()).prompt();
        assert_eq!(one.title, "Delete 1 Image?");

        let many = PendingDeletion::Bulk([1, 2, 3].into_iter().collect()).prompt();
        assert_eq!(many.title, "Delete 3 Images?");
        assert_eq!(
            many.message,
            "Are you sure you want to delete 3 selected images? This action cannot be undone."
        );
    }
}
