//! Aspect ratio policy: how a requested frame shape translates into an image
//! search filter and a preference order over the provider's size variants.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Variant used when none of a plan's preferred variants is present.
pub const FALLBACK_VARIANT: &str = "medium";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "9:16")]
    Vertical,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Widescreen,
        AspectRatio::Standard,
        AspectRatio::Square,
        AspectRatio::Vertical,
    ];

    /// Parse a `W:H` label. Unrecognized labels fall back to 16:9.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "4:3" => AspectRatio::Standard,
            "1:1" => AspectRatio::Square,
            "9:16" => AspectRatio::Vertical,
            _ => AspectRatio::Widescreen,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Standard => "4:3",
            AspectRatio::Square => "1:1",
            AspectRatio::Vertical => "9:16",
        }
    }

    pub fn plan(self) -> ImagePlan {
        resolve(self)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Orientation filter understood by the image-search provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePlan {
    /// Target frame size as (width, height) in pixels.
    pub dimensions: (u32, u32),
    pub orientation: Orientation,
    /// Variant names to try on a hit, most preferred first.
    pub preferred_variants: &'static [&'static str],
}

impl ImagePlan {
    /// Pick the URL for a hit: the first preferred variant that is present
    /// and non-empty, then [`FALLBACK_VARIANT`].
    pub fn pick_url(&self, variants: &HashMap<String, String>) -> Option<String> {
        self.preferred_variants
            .iter()
            .copied()
            .chain(std::iter::once(FALLBACK_VARIANT))
            .find_map(|name| {
                variants
                    .get(name)
                    .map(|url| url.trim())
                    .filter(|url| !url.is_empty())
                    .map(str::to_string)
            })
    }
}

/// Map a ratio to its image plan. Total and deterministic.
pub fn resolve(ratio: AspectRatio) -> ImagePlan {
    match ratio {
        AspectRatio::Widescreen => ImagePlan {
            dimensions: (1280, 720),
            orientation: Orientation::Landscape,
            preferred_variants: &["large2x", "landscape", "large", "medium"],
        },
        AspectRatio::Standard => ImagePlan {
            dimensions: (1024, 768),
            orientation: Orientation::Landscape,
            preferred_variants: &["large", "medium"],
        },
        // No true square asset exists upstream; clients crop for display.
        AspectRatio::Square => ImagePlan {
            dimensions: (800, 800),
            orientation: Orientation::Square,
            preferred_variants: &["large", "medium"],
        },
        AspectRatio::Vertical => ImagePlan {
            dimensions: (720, 1280),
            orientation: Orientation::Portrait,
            preferred_variants: &["portrait", "large", "medium"],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn square_plan_is_800_by_800() {
        let plan = resolve(AspectRatio::from_label("1:1"));
        assert_eq!(plan.dimensions, (800, 800));
        assert_eq!(plan.orientation, Orientation::Square);
    }

    #[test]
    fn each_ratio_maps_to_its_plan() {
        assert_eq!(AspectRatio::Widescreen.plan().dimensions, (1280, 720));
        assert_eq!(AspectRatio::Standard.plan().dimensions, (1024, 768));
        assert_eq!(AspectRatio::Vertical.plan().dimensions, (720, 1280));
        assert_eq!(AspectRatio::Vertical.plan().orientation, Orientation::Portrait);
        assert_eq!(
            AspectRatio::Widescreen.plan().preferred_variants,
            &["large2x", "landscape", "large", "medium"]
        );
    }

    #[test]
    fn unknown_label_uses_widescreen_plan() {
        for label in ["", "21:9", "16x9", "portrait"] {
            assert_eq!(resolve(AspectRatio::from_label(label)), AspectRatio::Widescreen.plan());
        }
    }

    #[test]
    fn resolve_is_deterministic_and_labels_round_trip() {
        for ratio in AspectRatio::ALL {
            assert_eq!(resolve(ratio), resolve(ratio));
            assert_eq!(AspectRatio::from_label(ratio.label()), ratio);
        }
    }

    #[test]
    fn pick_url_walks_preference_order() {
        let plan = AspectRatio::Widescreen.plan();
        let src = variants(&[
            ("medium", "https://img/m.jpg"),
            ("large", "https://img/l.jpg"),
            ("landscape", "https://img/ls.jpg"),
        ]);
        assert_eq!(plan.pick_url(&src).as_deref(), Some("https://img/ls.jpg"));
    }

    #[test]
    fn pick_url_skips_empty_variants_and_falls_back_to_medium() {
        let plan = AspectRatio::Vertical.plan();
        let src = variants(&[("portrait", ""), ("tiny", "https://img/t.jpg"), ("medium", "https://img/m.jpg")]);
        assert_eq!(plan.pick_url(&src).as_deref(), Some("https://img/m.jpg"));

        let bare = variants(&[("tiny", "https://img/t.jpg")]);
        assert_eq!(plan.pick_url(&bare), None);
    }

    #[test]
    fn ratio_serializes_as_label() {
        let json = serde_json::to_string(&AspectRatio::Vertical).unwrap();
        assert_eq!(json, "\"9:16\"");
    }
}
