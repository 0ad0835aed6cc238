//! Image resolution: one stock-photo search per script part, in order.

use crate::api::ImageSearch;
use crate::aspect::{AspectRatio, FALLBACK_VARIANT, ImagePlan};
use crate::error::ProviderError;
use crate::partition::{PartitionMode, partition};
use crate::{logi, logok, logw};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Hits requested per part: the first one is used.
const HITS_PER_PART: u32 = 1;
/// Hits requested for a quick preview search.
pub const PREVIEW_HITS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryboardImage {
    pub url: String,
    pub caption: String,
}

/// What a storyboard request asks for once validated.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryboardRequest {
    pub script: String,
    pub image_count: usize,
    pub aspect_ratio: AspectRatio,
    pub mode: PartitionMode,
}

#[derive(Debug, thiserror::Error)]
pub enum StoryboardError {
    #[error("Script contains no content to illustrate")]
    NoContent,
    #[error("No images found for the script")]
    NoImages,
}

#[derive(Clone)]
pub struct ImageResolver {
    search: Arc<dyn ImageSearch>,
}

impl ImageResolver {
    pub fn new(search: Arc<dyn ImageSearch>) -> Self {
        Self { search }
    }

    /// Resolve one image per part, sequentially and in part order.
    ///
    /// Parts whose search fails, returns no hits, or whose hit has no usable
    /// variant are skipped; the output is never longer than `parts`.
    pub async fn resolve(&self, parts: &[String], plan: &ImagePlan) -> Vec<StoryboardImage> {
        let mut images = Vec::with_capacity(parts.len());

        for (index, part) in parts.iter().enumerate() {
            let hits = match self
                .search
                .search(part, HITS_PER_PART, Some(plan.orientation))
                .await
            {
                Ok(hits) => hits,
                Err(err) => {
                    logw(format!("Part {} skipped, search failed: {}", index + 1, err));
                    continue;
                }
            };

            let Some(photo) = hits.first() else {
                logi(format!("Part {} skipped, no hits for {:?}", index + 1, part));
                continue;
            };

            let Some(url) = plan.pick_url(&photo.src) else {
                logw(format!(
                    "Part {} skipped, photo {} has no usable size variant",
                    index + 1,
                    photo.id
                ));
                continue;
            };

            images.push(StoryboardImage {
                url,
                caption: part.clone(),
            });
        }

        images
    }

    /// Partition the script, resolve its parts, and report an empty outcome
    /// as an error distinct from transport failures.
    pub async fn storyboard(
        &self,
        request: &StoryboardRequest,
    ) -> Result<Vec<StoryboardImage>, StoryboardError> {
        let parts = partition(&request.script, request.image_count, request.mode);
        if parts.is_empty() {
            return Err(StoryboardError::NoContent);
        }

        let plan = request.aspect_ratio.plan();
        logi(format!(
            "Resolving {} parts at {} ({}x{}, {})",
            parts.len(),
            request.aspect_ratio,
            plan.dimensions.0,
            plan.dimensions.1,
            plan.orientation.as_str()
        ));

        let images = self.resolve(&parts, &plan).await;
        if images.is_empty() {
            logw("No images resolved for any part".to_string());
            return Err(StoryboardError::NoImages);
        }

        logok(format!("Resolved {}/{} images", images.len(), parts.len()));
        Ok(images)
    }

    /// Up to [`PREVIEW_HITS`] medium-sized URLs for a free-text prompt.
    /// Unlike [`ImageResolver::resolve`], a provider failure is returned.
    pub async fn preview(&self, prompt: &str) -> Result<Vec<String>, ProviderError> {
        let hits = self.search.search(prompt, PREVIEW_HITS, None).await?;
        Ok(hits
            .into_iter()
            .filter_map(|photo| photo.src.get(FALLBACK_VARIANT).cloned())
            .filter(|url| !url.trim().is_empty())
            .collect())
    }
}
