//! Render models. Built from component snapshots; never mutate anything.

use serde::Serialize;
use showcase_admin::AdminSession;
use showcase_core::{ImageId, Review};
use showcase_gallery::{
    ConfirmationPrompt, DeletionWorkflow, GalleryCatalog, SelectionController, StagedImage,
    StagingArea,
};
use showcase_reviews::ReviewLedger;

// ─── Reviews ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewCard {
    pub name: String,
    pub location: Option<String>,
    pub rating: u8,
    /// Five slots, filled then empty: `★★★★☆`.
    pub stars: String,
    pub message: String,
    /// `created` as `YYYY-MM-DD`, or verbatim when it does not parse.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewsView {
    pub cards: Vec<ReviewCard>,
    /// Reviews held back behind "Show More".
    pub hidden: usize,
    pub average: String,
    pub empty_message: Option<String>,
}

impl ReviewsView {
    pub fn show_more_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("Show More ({} more)", self.hidden))
    }
}

pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn review_card(review: &Review) -> ReviewCard {
    ReviewCard {
        name: review.name.clone(),
        location: review.location().map(str::to_string),
        rating: review.rating,
        stars: stars(review.rating),
        message: review.message.clone(),
        date: review
            .created_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| review.created.clone()),
    }
}

pub fn reviews_view(
    ledger: &ReviewLedger,
    preview_count: usize,
    decimals: usize,
    expanded: bool,
) -> ReviewsView {
    let reviews = ledger.reviews();
    let shown = if expanded {
        reviews.len()
    } else {
        reviews.len().min(preview_count)
    };
    ReviewsView {
        cards: reviews[..shown].iter().map(review_card).collect(),
        hidden: reviews.len() - shown,
        average: ledger.format_average(decimals),
        empty_message: reviews
            .is_empty()
            .then(|| "Be the first to share your experience.".to_string()),
    }
}

// ─── Gallery ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryTile {
    pub id: ImageId,
    pub src: String,
    /// Admin-only select checkbox and remove button.
    pub controls: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkBar {
    pub visible: bool,
    pub selected_label: String,
    pub select_all_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    pub tiles: Vec<GalleryTile>,
    pub empty_message: Option<String>,
    /// Present only for admins.
    pub bulk: Option<BulkBar>,
}

pub fn gallery_view(
    catalog: &GalleryCatalog,
    session: &AdminSession,
    selection: &SelectionController,
) -> GalleryView {
    let admin = session.is_logged_in();
    let tiles = catalog
        .images()
        .iter()
        .map(|img| GalleryTile {
            id: img.id,
            src: img.src.clone(),
            controls: admin,
            selected: admin && selection.contains(img.id),
        })
        .collect();
    let bulk = admin.then(|| BulkBar {
        visible: selection.bulk_actions_enabled(),
        selected_label: format!("{} selected", selection.len()),
        select_all_label: if selection.len() == catalog.len() {
            "Deselect All".to_string()
        } else {
            "Select All".to_string()
        },
    });
    GalleryView {
        tiles,
        empty_message: catalog
            .is_empty()
            .then(|| "No images in gallery yet.".to_string()),
        bulk,
    }
}

// ─── Admin panel ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminPanelView {
    pub show_login_form: bool,
    pub header: Option<String>,
    pub show_upload: bool,
    pub previews: Vec<StagedPreview>,
    pub save_enabled: bool,
    pub confirmation: Option<PromptView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedPreview {
    pub id: ImageId,
    pub name: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptView {
    pub title: String,
    pub message: String,
}

impl From<ConfirmationPrompt> for PromptView {
    fn from(p: ConfirmationPrompt) -> Self {
        Self {
            title: p.title,
            message: p.message,
        }
    }
}

impl From<StagedImage> for StagedPreview {
    fn from(s: StagedImage) -> Self {
        Self {
            id: s.id,
            name: s.name,
            src: s.src,
        }
    }
}

pub fn admin_view(
    session: &AdminSession,
    staging: &StagingArea,
    deletion: &DeletionWorkflow,
) -> AdminPanelView {
    let admin = session.is_logged_in();
    let previews: Vec<StagedPreview> = if admin {
        staging.entries().into_iter().map(Into::into).collect()
    } else {
        Vec::new()
    };
    AdminPanelView {
        show_login_form: !admin,
        header: session
            .current_admin()
            .filter(|_| admin)
            .map(|name| format!("Admin Dashboard ({name})")),
        show_upload: admin,
        save_enabled: !previews.is_empty(),
        previews,
        confirmation: deletion.prompt().map(Into::into),
    }
}
