//! services/api/src/adapters/bunny.rs
//!
//! The live video-provider adapter: implements the `VideoService` port
//! against the Bunny Stream API. Only ingest operations live here; playback
//! URLs are derived from the stored `VideoRef`, never fetched.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use course_market_core::ports::{PortError, PortResult, VideoHandle, VideoService};

/// A video adapter that implements the `VideoService` port.
#[derive(Clone)]
pub struct BunnyVideoAdapter {
    client: reqwest::Client,
    base_url: String,
    library_id: String,
    api_key: String,
}

#[derive(Deserialize)]
struct CreateVideoResponse {
    guid: String,
}

impl BunnyVideoAdapter {
    pub fn new(base_url: String, library_id: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            library_id,
            api_key,
        }
    }

    fn video_url(&self, video_id: &str) -> String {
        format!(
            "{}/library/{}/videos/{}",
            self.base_url, self.library_id, video_id
        )
    }
}

fn upstream(e: reqwest::Error) -> PortError {
    PortError::Upstream(format!("video provider request failed: {}", e))
}

#[async_trait]
impl VideoService for BunnyVideoAdapter {
    async fn create_video(&self, title: &str) -> PortResult<VideoHandle> {
        let url = format!("{}/library/{}/videos", self.base_url, self.library_id);
        let response = self
            .client
            .post(&url)
            .header("AccessKey", &self.api_key)
            .json(&json!({ "title": title }))
            .send()
            .await
            .map_err(upstream)?;
        if !response.status().is_success() {
            return Err(PortError::Upstream(format!(
                "video provider returned {} creating a video",
                response.status()
            )));
        }
        let created: CreateVideoResponse = response.json().await.map_err(upstream)?;
        Ok(VideoHandle {
            video_id: created.guid,
            library_id: self.library_id.clone(),
        })
    }

    async fn upload_video(&self, video_id: &str, data: Vec<u8>) -> PortResult<()> {
        let response = self
            .client
            .put(self.video_url(video_id))
            .header("AccessKey", &self.api_key)
            .header("Content-Type", "video/mp4")
            .body(data)
            .send()
            .await
            .map_err(upstream)?;
        if !response.status().is_success() {
            return Err(PortError::Upstream(format!(
                "video provider returned {} for the upload",
                response.status()
            )));
        }
        Ok(())
    }

    async fn delete_video(&self, video_id: &str) -> PortResult<()> {
        let response = self
            .client
            .delete(self.video_url(video_id))
            .header("AccessKey", &self.api_key)
            .send()
            .await
            .map_err(upstream)?;
        if !response.status().is_success() {
            return Err(PortError::Upstream(format!(
                "video provider returned {} deleting the video",
                response.status()
            )));
        }
        Ok(())
    }
}
