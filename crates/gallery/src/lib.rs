//! Admin-curated image gallery.
//!
//! - [`staging`]: two-phase upload buffer with concurrent decoding
//! - [`catalog`]: persisted, capacity-bounded image list
//! - [`selection`]: ids marked for bulk actions
//! - [`deletion`]: single/bulk delete confirmation state machine

pub mod catalog;
pub mod deletion;
pub mod selection;
pub mod staging;

pub use catalog::GalleryCatalog;
pub use deletion::{ConfirmationPrompt, DeletionOutcome, DeletionWorkflow, PendingDeletion};
pub use selection::SelectionController;
pub use staging::{StagedImage, StagingArea, StagingBatch, UploadFile};
