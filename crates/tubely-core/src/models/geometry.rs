use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Coarse aspect-ratio bucket of a video.
///
/// Only used to choose a storage prefix; it is never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GeometryClass {
    /// Roughly 16:9.
    Landscape,
    /// Roughly 9:16.
    Portrait,
    Other,
}

impl GeometryClass {
    /// Lowercase name used as the storage key prefix.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            GeometryClass::Landscape => "landscape",
            GeometryClass::Portrait => "portrait",
            GeometryClass::Other => "other",
        }
    }
}

impl Display for GeometryClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.canonical_name())
    }
}
