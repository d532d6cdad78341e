//! Gallery settings read from the environment.

use crate::layout::LayoutChunker;
use crate::scanner::ScanConfig;

const DEFAULT_TITLE: &str = "Reels";
const DEFAULT_ROW_PATTERN: [usize; 2] = [3, 2];

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Mute flag applied to every element before it loads.
    pub start_muted: bool,
    /// Issue a play command as soon as a card becomes ready.
    pub autoplay: bool,
    pub looping: bool,
    /// Row sizes, repeated; even slots portrait, odd slots landscape.
    pub row_pattern: Vec<usize>,
    pub title: String,
    /// Directory sources: descend into subdirectories.
    pub recursive: bool,
    /// Directory sources: follow symbolic links while scanning.
    pub follow_symlinks: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            start_muted: true,
            autoplay: false,
            looping: true,
            row_pattern: DEFAULT_ROW_PATTERN.to_vec(),
            title: DEFAULT_TITLE.to_string(),
            recursive: false,
            follow_symlinks: false,
        }
    }
}

impl GalleryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            start_muted: lookup("REELGRID_START_MUTED")
                .and_then(|v| parse_flag("REELGRID_START_MUTED", &v))
                .unwrap_or(defaults.start_muted),
            autoplay: lookup("REELGRID_AUTOPLAY")
                .and_then(|v| parse_flag("REELGRID_AUTOPLAY", &v))
                .unwrap_or(defaults.autoplay),
            looping: lookup("REELGRID_LOOP")
                .and_then(|v| parse_flag("REELGRID_LOOP", &v))
                .unwrap_or(defaults.looping),
            row_pattern: lookup("REELGRID_ROW_PATTERN")
                .and_then(|v| parse_pattern(&v))
                .unwrap_or(defaults.row_pattern),
            title: lookup("REELGRID_TITLE")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.title),
            recursive: lookup("REELGRID_RECURSIVE")
                .and_then(|v| parse_flag("REELGRID_RECURSIVE", &v))
                .unwrap_or(defaults.recursive),
            follow_symlinks: lookup("REELGRID_FOLLOW_LINKS")
                .and_then(|v| parse_flag("REELGRID_FOLLOW_LINKS", &v))
                .unwrap_or(defaults.follow_symlinks),
        }
    }

    pub fn chunker(&self) -> LayoutChunker {
        LayoutChunker::from_sizes(&self.row_pattern)
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            recursive: self.recursive,
            follow_symlinks: self.follow_symlinks,
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!(key, value = other, "unrecognized flag value, using default");
            None
        }
    }
}

fn parse_pattern(value: &str) -> Option<Vec<usize>> {
    let sizes: Result<Vec<usize>, _> = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse::<usize>)
        .collect();
    match sizes {
        Ok(sizes) if sizes.iter().any(|size| *size > 0) => Some(sizes),
        _ => {
            tracing::warn!(value, "invalid REELGRID_ROW_PATTERN, using default");
            None
        }
    }
}
