//! crates/course_market_core/src/video.rs
//!
//! The internal video reference format, `{provider}://{library}/{videoId}`.
//! This is the one bit-exact format in the system: a stored reference must
//! parse back into the identical components it was encoded from before a
//! playback URL can be constructed.

use std::fmt;
use std::str::FromStr;

/// Delivery host used for embed playback URLs.
const PLAYBACK_HOST: &str = "iframe.mediadelivery.net";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid video reference: {0}")]
pub struct VideoRefError(pub String);

/// An opaque provider-scoped video reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub provider: String,
    pub library_id: String,
    pub video_id: String,
}

impl VideoRef {
    pub fn new(provider: &str, library_id: &str, video_id: &str) -> Self {
        Self {
            provider: provider.to_string(),
            library_id: library_id.to_string(),
            video_id: video_id.to_string(),
        }
    }

    /// Deterministic embed playback URL for the referenced video.
    pub fn playback_url(&self) -> String {
        format!(
            "https://{}/embed/{}/{}",
            PLAYBACK_HOST, self.library_id, self.video_id
        )
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}/{}",
            self.provider, self.library_id, self.video_id
        )
    }
}

impl FromStr for VideoRef {
    type Err = VideoRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, rest) = s
            .split_once("://")
            .ok_or_else(|| VideoRefError(s.to_string()))?;
        let (library_id, video_id) = rest
            .split_once('/')
            .ok_or_else(|| VideoRefError(s.to_string()))?;
        if provider.is_empty() || library_id.is_empty() || video_id.is_empty() {
            return Err(VideoRefError(s.to_string()));
        }
        Ok(Self::new(provider, library_id, video_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_exactly() {
        let raw = "bunny://527238/demo-video-1";
        let parsed: VideoRef = raw.parse().unwrap();
        assert_eq!(parsed.provider, "bunny");
        assert_eq!(parsed.library_id, "527238");
        assert_eq!(parsed.video_id, "demo-video-1");
        assert_eq!(parsed.to_string(), raw);
    }

    #[test]
    fn builds_the_embed_playback_url() {
        let v = VideoRef::new("bunny", "527238", "abc-123");
        assert_eq!(
            v.playback_url(),
            "https://iframe.mediadelivery.net/embed/527238/abc-123"
        );
    }

    #[test]
    fn rejects_malformed_references() {
        assert!("bunny:/527238/vid".parse::<VideoRef>().is_err());
        assert!("bunny://527238".parse::<VideoRef>().is_err());
        assert!("://527238/vid".parse::<VideoRef>().is_err());
        assert!("bunny:///vid".parse::<VideoRef>().is_err());
    }

    #[test]
    fn video_id_may_contain_slashes_free_tail() {
        // Only the first '/' after the library id is structural.
        let parsed: VideoRef = "bunny://lib/a/b".parse().unwrap();
        assert_eq!(parsed.library_id, "lib");
        assert_eq!(parsed.video_id, "a/b");
        assert_eq!(parsed.to_string(), "bunny://lib/a/b");
    }
}
