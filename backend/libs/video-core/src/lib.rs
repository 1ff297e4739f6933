//! Video catalog core models and normalization rules
//!
//! Shared data structures for content-service and related systems

pub mod category;
pub mod constants;
pub mod format;
pub mod models;

pub use category::classify_title;
pub use format::{format_duration, format_relative, format_view_count, format_views};
pub use models::*;
