//! Database repositories for data access layer
//
// Video records (ownership and stored artifact locator)
pub mod video;

pub use video::{PgVideoRepository, VideoRepository, VideoRow};
