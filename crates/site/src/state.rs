//! The site's owned state. Every UI action is a method here; rendering
//! goes through the read-only accessors and [`crate::view`].

use showcase_admin::{AdminSession, CredentialVerifier, StaticCredentials};
use showcase_core::{AppConfig, ImageId, Review, ReviewDraft, ShowcaseResult};
use showcase_gallery::{
    ConfirmationPrompt, DeletionOutcome, DeletionWorkflow, GalleryCatalog, SelectionController,
    StagingArea, StagingBatch, UploadFile,
};
use showcase_reviews::ReviewLedger;
use showcase_storage::SharedStore;
use std::sync::Arc;
use tracing::info;

use crate::notices::{images, NoticeBoard};
use crate::view::{self, AdminPanelView, GalleryView, ReviewsView};

pub struct SiteState {
    config: AppConfig,
    store: SharedStore,
    reviews: ReviewLedger,
    catalog: GalleryCatalog,
    staging: StagingArea,
    session: AdminSession,
    selection: SelectionController,
    deletion: DeletionWorkflow,
    notices: NoticeBoard,
}

impl SiteState {
    /// Load every component from `store`, checking logins against the
    /// accounts listed in the configuration.
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        let verifier = Arc::new(StaticCredentials::new(config.admin.accounts.clone()));
        Self::with_verifier(config, store, verifier)
    }

    pub fn with_verifier(
        config: AppConfig,
        store: SharedStore,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let reviews = ReviewLedger::open(store.clone(), config.reviews.capacity);
        let catalog = GalleryCatalog::open(store.clone(), config.gallery.capacity);
        let staging = StagingArea::new(catalog.max_id());
        let session = AdminSession::restore(store.clone(), verifier);
        let notices = NoticeBoard::new(config.notices.toast_ms);

        info!(
            reviews = reviews.len(),
            images = catalog.len(),
            admin = session.current_admin().unwrap_or("-"),
            "Site state loaded"
        );

        Self {
            config,
            store,
            reviews,
            catalog,
            staging,
            session,
            selection: SelectionController::default(),
            deletion: DeletionWorkflow::new(),
            notices,
        }
    }

    /// Re-read everything persisted. Whatever another instance wrote last
    /// wins; the selection and any pending single deletion are pruned to the
    /// images that still exist.
    pub fn reload(&mut self) {
        self.reviews.reload();
        self.catalog.reload();
        self.session.reload();
        self.staging.observe_id(self.catalog.max_id());

        if self.session.is_logged_in() {
            self.selection.retain_existing(&self.catalog);
            self.deletion.retain_existing(&self.catalog);
        } else {
            self.selection.clear();
            self.deletion.cancel();
        }
    }

    // ─── Reviews ───────────────────────────────────────────────────────────

    pub fn submit_review(&mut self, draft: ReviewDraft) -> ShowcaseResult<Review> {
        self.reviews.submit(draft).cloned()
    }

    // ─── Session ───────────────────────────────────────────────────────────

    pub fn login(&mut self, username: &str, password: &str) -> ShowcaseResult<()> {
        self.session.login(username, password)
    }

    /// End the admin session along with everything that only exists during
    /// one: the selection, a pending deletion and staged uploads.
    pub fn logout(&mut self) {
        self.session.logout();
        self.selection.clear();
        self.deletion.cancel();
        self.staging.reset();
    }

    // ─── Uploads ───────────────────────────────────────────────────────────

    /// Start decoding `files` into the staging list. Spawns blocking tasks,
    /// so it must run inside a Tokio runtime; callers go through
    /// [`SiteState::stage_uploads`].
    fn begin_upload(&self, files: Vec<UploadFile>) -> ShowcaseResult<StagingBatch> {
        self.session.require_admin()?;
        Ok(self.staging.begin(files))
    }

    /// Decode and stage `files`, returning how many were staged.
    pub async fn stage_uploads(&self, files: Vec<UploadFile>) -> ShowcaseResult<usize> {
        let batch = self.begin_upload(files)?;
        Ok(batch.finish().await)
    }

    pub fn unstage(&self, id: ImageId) -> bool {
        self.staging.unstage(id)
    }

    pub fn reset_uploads(&self) {
        self.staging.reset();
    }

    pub fn commit_uploads(&mut self) -> ShowcaseResult<usize> {
        let committed = self.catalog.commit_staged(&self.session, &self.staging)?;
        if committed > 0 {
            self.notices
                .post(format!("{} added to gallery!", images(committed)));
        }
        Ok(committed)
    }

    // ─── Selection ─────────────────────────────────────────────────────────

    pub fn toggle_selection(&mut self, id: ImageId, selected: bool) -> ShowcaseResult<bool> {
        self.session.require_admin()?;
        Ok(self.selection.toggle(&self.catalog, id, selected))
    }

    pub fn select_all(&mut self) -> ShowcaseResult<usize> {
        self.session.require_admin()?;
        Ok(self.selection.select_all(&self.catalog))
    }

    // ─── Deletion ──────────────────────────────────────────────────────────

    /// Ask to delete one image, or the selection when `target` is `None`.
    /// Returns the confirmation prompt when a request is pending.
    pub fn request_delete(
        &mut self,
        target: Option<ImageId>,
    ) -> ShowcaseResult<Option<ConfirmationPrompt>> {
        self.session.require_admin()?;
        Ok(self
            .deletion
            .request_delete(target, &self.selection)
            .map(|p| p.prompt()))
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.deletion.cancel()
    }

    pub fn confirm_delete(&mut self) -> ShowcaseResult<DeletionOutcome> {
        let outcome =
            self.deletion
                .confirm(&self.session, &mut self.catalog, &mut self.selection)?;
        match &outcome {
            DeletionOutcome::Nothing => {}
            DeletionOutcome::Single { .. } => {
                self.notices.post("Image deleted successfully!");
            }
            DeletionOutcome::Bulk { requested, .. } => {
                self.notices
                    .post(format!("{} deleted successfully!", images(*requested)));
            }
        }
        Ok(outcome)
    }

    // ─── Views ─────────────────────────────────────────────────────────────

    pub fn reviews_view(&self, expanded: bool) -> ReviewsView {
        view::reviews_view(
            &self.reviews,
            self.config.reviews.preview_count,
            self.config.reviews.rating_decimals,
            expanded,
        )
    }

    pub fn gallery_view(&self) -> GalleryView {
        view::gallery_view(&self.catalog, &self.session, &self.selection)
    }

    pub fn admin_view(&self) -> AdminPanelView {
        view::admin_view(&self.session, &self.staging, &self.deletion)
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn reviews(&self) -> &ReviewLedger {
        &self.reviews
    }

    pub fn catalog(&self) -> &GalleryCatalog {
        &self.catalog
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn deletion(&self) -> &DeletionWorkflow {
        &self.deletion
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.dismiss();
    }
}
