//! Structured content-type handling.
//!
//! Declared content types arrive as free-form header values. They are parsed once into a
//! [`ContentType`] and every downstream decision (acceptance, file extension, object
//! metadata) reads the structured value.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentTypeError {
    #[error("Malformed content type: '{0}'")]
    Malformed(String),

    #[error("Unsupported media type '{content_type}', allowed: {allowed:?}")]
    Unsupported {
        content_type: String,
        allowed: Vec<String>,
    },
}

/// A parsed `type/subtype` pair. Parameters are accepted and ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentType(mime::Mime);

impl ContentType {
    pub fn parse(raw: &str) -> Result<Self, ContentTypeError> {
        let trimmed = raw.trim();
        let parsed: mime::Mime = trimmed
            .parse()
            .map_err(|_| ContentTypeError::Malformed(raw.to_string()))?;

        let type_ = parsed.type_().as_str();
        let subtype = parsed.subtype().as_str();
        if type_.is_empty() || subtype.is_empty() || type_ == "*" || subtype == "*" {
            return Err(ContentTypeError::Malformed(raw.to_string()));
        }

        Ok(Self(parsed))
    }

    pub fn type_(&self) -> &str {
        self.0.type_().as_str()
    }

    pub fn subtype(&self) -> &str {
        self.0.subtype().as_str()
    }

    /// `type/subtype` without parameters, e.g. `video/mp4`.
    pub fn essence(&self) -> &str {
        self.0.essence_str()
    }

    /// File extension derived from the subtype, with a leading dot (`video/mp4` -> `.mp4`).
    pub fn extension(&self) -> String {
        format!(".{}", self.subtype().to_ascii_lowercase())
    }

    /// Check the essence against an allow-list. Parameters never affect acceptance.
    pub fn ensure_allowed(&self, allowed: &[String]) -> Result<(), ContentTypeError> {
        if allowed
            .iter()
            .any(|candidate| candidate.trim().eq_ignore_ascii_case(self.essence()))
        {
            Ok(())
        } else {
            Err(ContentTypeError::Unsupported {
                content_type: self.essence().to_string(),
                allowed: allowed.to_vec(),
            })
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.essence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_mp4() {
        let ct = ContentType::parse("video/mp4").unwrap();
        assert_eq!(ct.type_(), "video");
        assert_eq!(ct.subtype(), "mp4");
        assert_eq!(ct.essence(), "video/mp4");
        assert_eq!(ct.extension(), ".mp4");
    }

    #[test]
    fn test_parameters_do_not_change_essence() {
        let ct = ContentType::parse("video/mp4; codecs=avc1").unwrap();
        assert_eq!(ct.essence(), "video/mp4");
        assert_eq!(ct.extension(), ".mp4");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["", "mp4", "not a content type", "video/*"] {
            assert!(
                matches!(ContentType::parse(raw), Err(ContentTypeError::Malformed(_))),
                "expected '{}' to be malformed",
                raw
            );
        }
    }

    #[test]
    fn test_ensure_allowed() {
        let allowed = vec!["video/mp4".to_string()];

        let mp4 = ContentType::parse("video/mp4; codecs=avc1").unwrap();
        assert!(mp4.ensure_allowed(&allowed).is_ok());

        let png = ContentType::parse("image/png").unwrap();
        match png.ensure_allowed(&allowed) {
            Err(ContentTypeError::Unsupported {
                content_type,
                allowed,
            }) => {
                assert_eq!(content_type, "image/png");
                assert_eq!(allowed, vec!["video/mp4".to_string()]);
            }
            other => panic!("Expected Unsupported, got {:?}", other),
        }
    }
}
