use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::AdminAccount;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `SHOWCASE__`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reviews: ReviewsConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub notices: NoticeConfig,
    #[serde(default)]
    pub widgets: WidgetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Upper bound on the total bytes held by the store, if any.
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsConfig {
    #[serde(default = "default_review_capacity")]
    pub capacity: usize,
    #[serde(default = "default_preview_count")]
    pub preview_count: usize,
    #[serde(default = "default_rating_decimals")]
    pub rating_decimals: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_gallery_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_accounts")]
    pub accounts: Vec<AdminAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoticeConfig {
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_count_up_ms")]
    pub count_up_ms: u64,
    #[serde(default = "default_header_hide_offset")]
    pub header_hide_offset: f64,
}

// Default functions
fn default_data_dir() -> PathBuf {
    PathBuf::from("./showcase-data")
}
fn default_review_capacity() -> usize {
    50
}
fn default_preview_count() -> usize {
    5
}
fn default_rating_decimals() -> usize {
    1
}
fn default_gallery_capacity() -> usize {
    50
}
fn default_admin_accounts() -> Vec<AdminAccount> {
    vec![
        AdminAccount::new("admin", "showcase.admin@123"),
        AdminAccount::new("manager", "manager456"),
    ]
}
fn default_toast_ms() -> u64 {
    4000
}
fn default_count_up_ms() -> u64 {
    1600
}
fn default_header_hide_offset() -> f64 {
    100.0
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            quota_bytes: None,
        }
    }
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            capacity: default_review_capacity(),
            preview_count: default_preview_count(),
            rating_decimals: default_rating_decimals(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            capacity: default_gallery_capacity(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            accounts: default_admin_accounts(),
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            toast_ms: default_toast_ms(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            count_up_ms: default_count_up_ms(),
            header_hide_offset: default_header_hide_offset(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (if given and present) layered under
    /// `SHOWCASE__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("SHOWCASE")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(config.normalized())
    }

    /// Clamp values that would break collection invariants.
    pub fn normalized(mut self) -> Self {
        self.reviews.capacity = self.reviews.capacity.max(1);
        self.gallery.capacity = self.gallery.capacity.max(1);
        self.reviews.preview_count = self.reviews.preview_count.max(1);
        self
    }
}
