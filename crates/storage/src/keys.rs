//! Logical names of the persisted values.

/// Array of reviews, newest first.
pub const REVIEWS: &str = "reviews";
/// Array of gallery images, newest first.
pub const GALLERY_IMAGES: &str = "gallery_images";
/// Boolean admin session flag.
pub const ADMIN_AUTH: &str = "admin_auth";
/// Username of the logged-in admin.
pub const CURRENT_ADMIN: &str = "current_admin";
