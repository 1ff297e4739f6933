/// Business logic layer for content-service
pub mod video_catalog;

pub use video_catalog::{
    CatalogError, CatalogResult, CatalogSource, VideoCatalogService, VideoListing,
};
