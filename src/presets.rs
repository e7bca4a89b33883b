//! Social-media image size presets.
//!
//! A preset is a named target size for one placement on one platform
//! (an Instagram story, a YouTube thumbnail, ...). Applying a preset covers
//! the target size and center-crops, see [`imaging::fill_to_size`].
//!
//! The table is static: sizes change when platforms redesign, not at runtime.
//!
//! [`imaging::fill_to_size`]: crate::imaging::fill_to_size

use crate::imaging::Dimensions;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum Platform {
    Instagram,
    #[value(name = "tiktok")]
    TikTok,
    #[value(name = "youtube")]
    YouTube,
    X,
    #[value(name = "linkedin")]
    LinkedIn,
    Facebook,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::X => "X",
            Platform::LinkedIn => "LinkedIn",
            Platform::Facebook => "Facebook",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub platform: Platform,
    pub title: &'static str,
    pub width: u32,
    pub height: u32,
    /// Safe areas, crop behaviour and other placement caveats.
    pub notes: &'static str,
    pub tags: &'static [&'static str],
}

impl Preset {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Size as shown to users, e.g. `1080 × 1350`.
    pub fn size_label(&self) -> String {
        format!("{} × {}", self.width, self.height)
    }
}

pub const PRESETS: &[Preset] = &[
    // Instagram
    Preset {
        id: "ig-post-portrait",
        platform: Platform::Instagram,
        title: "Post (Portrait / Feed)",
        width: 1080,
        height: 1350,
        notes: "Grid may crop to a vertical layout; keep key content centered.",
        tags: &["post", "feed", "4:5", "resize", "crop"],
    },
    Preset {
        id: "ig-story",
        platform: Platform::Instagram,
        title: "Story (9:16)",
        width: 1080,
        height: 1920,
        notes: "Safe area: 1080 × 1610 (avoid UI overlays).",
        tags: &["story", "safe-area", "9:16", "export"],
    },
    Preset {
        id: "ig-reel",
        platform: Platform::Instagram,
        title: "Reel (Feed / 9:16)",
        width: 1080,
        height: 1920,
        notes: "Grid preview often appears as 3:4 (1080 × 1440).",
        tags: &["reel", "9:16", "thumbnail", "grid"],
    },
    // TikTok
    Preset {
        id: "tt-video",
        platform: Platform::TikTok,
        title: "Video / Carousel (9:16)",
        width: 1080,
        height: 1920,
        notes: "Best fit for full-screen; other ratios may get letterboxed.",
        tags: &["tiktok", "9:16", "carousel", "resize"],
    },
    Preset {
        id: "tt-profile",
        platform: Platform::TikTok,
        title: "Profile Photo",
        width: 200,
        height: 200,
        notes: "Upload larger for future-proofing; will display as a circle.",
        tags: &["avatar", "profile", "circle", "crop"],
    },
    // YouTube
    Preset {
        id: "yt-banner",
        platform: Platform::YouTube,
        title: "Channel Banner",
        width: 2560,
        height: 1440,
        notes: "Safe area (all devices): 1546 × 423 — keep text/logo inside.",
        tags: &["banner", "safe-area", "channel-art", "export"],
    },
    Preset {
        id: "yt-thumb",
        platform: Platform::YouTube,
        title: "Video Thumbnail",
        width: 1280,
        height: 720,
        notes: "16:9 recommended; keep main subject centered.",
        tags: &["thumbnail", "16:9", "youtube"],
    },
    // X
    Preset {
        id: "x-header",
        platform: Platform::X,
        title: "Header Photo",
        width: 1500,
        height: 500,
        notes: "May crop ~60px top/bottom depending on browser/monitor.",
        tags: &["header", "cover", "crop"],
    },
    Preset {
        id: "x-post-landscape",
        platform: Platform::X,
        title: "In-stream (Landscape)",
        width: 1280,
        height: 720,
        notes: "Recommended ratios: 16:9 or 1:1.",
        tags: &["post", "16:9", "resize"],
    },
    // LinkedIn
    Preset {
        id: "li-cover",
        platform: Platform::LinkedIn,
        title: "Profile Cover",
        width: 1584,
        height: 396,
        notes: "Cropping differs on desktop/mobile — test both.",
        tags: &["cover", "profile", "crop"],
    },
    Preset {
        id: "li-post-link",
        platform: Platform::LinkedIn,
        title: "Post (Link Preview)",
        width: 1200,
        height: 627,
        notes: "Great for URL shares.",
        tags: &["post", "link", "1.91:1", "resize"],
    },
    // Facebook
    Preset {
        id: "fb-cover",
        platform: Platform::Facebook,
        title: "Cover Photo",
        width: 851,
        height: 315,
        notes: "Displays differently on mobile/desktop; avoid bottom-left overlap.",
        tags: &["cover", "page", "crop"],
    },
    Preset {
        id: "fb-story",
        platform: Platform::Facebook,
        title: "Story (9:16)",
        width: 1080,
        height: 1920,
        notes: "Full-screen story format.",
        tags: &["story", "9:16", "export"],
    },
];

/// Look up a preset by id (`ig-story`, `yt-thumb`, ...).
pub fn find_preset(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

/// Presets for one platform, or all of them for `None`. Table order is kept.
pub fn presets_for(platform: Option<Platform>) -> Vec<&'static Preset> {
    PRESETS
        .iter()
        .filter(|p| platform.is_none_or(|wanted| p.platform == wanted))
        .collect()
}
