//! Domain models for the video ingestion pipeline.

pub mod geometry;
pub mod pipeline;
pub mod video;

pub use geometry::GeometryClass;
pub use pipeline::PipelineStage;
pub use video::{LocatorMode, Video, VideoLocator, VideoResponse};
