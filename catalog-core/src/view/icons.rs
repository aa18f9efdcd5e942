//! src/view/icons.rs
//! ============================================================================
//! # Catalog Icons

pub const FAVORITE_ICON: &str = "♥";
pub const NOT_FAVORITE_ICON: &str = "·";
pub const RATING_ICON: &str = "★";
pub const SEARCH_ICON: &str = "";
pub const PENDING_ICON: &str = "…";
