pub mod thumbnail;
pub mod upload;
pub mod video_url;

pub use thumbnail::ThumbnailUploadService;
pub use upload::{UploadOutcome, VideoUploadService};
pub use video_url::resolve_video_response;
