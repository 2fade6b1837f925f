//! Site-level wiring for the showcase widgets.
//!
//! # Modules
//!
//! - [`state`]: [`SiteState`], the one owner of every component; UI actions
//!   go through it and rendering reads from it
//! - [`notices`]: transient confirmation messages
//! - [`view`]: read-only render models derived from the state
//! - [`widgets`]: presentational state (drawer, header, count-up, ad overlay)

pub mod notices;
pub mod state;
pub mod view;
pub mod widgets;

pub use notices::{Notice, NoticeBoard};
pub use state::SiteState;
pub use view::{AdminPanelView, GalleryView, ReviewsView};
pub use widgets::PageChrome;
