//! Loads reel lists from a JSON manifest or a directory of videos.
//!
//! This module provides the `ReelScanner` struct which handles:
//! - Manifest parsing (`null`, a single reel object, or an array of reels)
//! - Resolving manifest-relative source paths
//! - Directory scanning using walkdir, with optional `<stem>.txt` descriptions

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::{has_uri_scheme, normalize, ReelInput, ReelItem};

const MANIFEST_FILE_NAME: &str = "reels.json";
const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "webm", "mkv", "mov", "avi", "m4v"];

/// Where the gallery content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReelSource {
    Manifest(PathBuf),
    Directory(PathBuf),
}

impl ReelSource {
    /// Directories are scanned, anything else is read as a manifest.
    pub fn from_path(path: &Path) -> Self {
        if path.is_dir() {
            Self::Directory(path.to_path_buf())
        } else {
            Self::Manifest(path.to_path_buf())
        }
    }

    /// `$XDG_CONFIG_HOME/reelgrid/reels.json`, if it exists.
    pub fn default_manifest() -> Option<Self> {
        let dirs = ProjectDirs::from("com", "reelgrid", "reelgrid")?;
        let path = dirs.config_dir().join(MANIFEST_FILE_NAME);
        path.is_file().then_some(Self::Manifest(path))
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Manifest(path) | Self::Directory(path) => path,
        }
    }
}

/// Configuration for the directory scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to scan directories recursively.
    pub recursive: bool,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            follow_symlinks: false,
        }
    }
}

pub struct ReelScanner {
    config: ScanConfig,
}

impl ReelScanner {
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Loads the ordered reel list for `source`. Blocking; run off the UI thread.
    pub fn load(&self, source: &ReelSource) -> Result<Vec<ReelItem>> {
        let items = match source {
            ReelSource::Manifest(path) => Self::load_manifest(path)?,
            ReelSource::Directory(path) => self.scan_directory(path)?,
        };
        info!("Loaded {} reels from {:?}", items.len(), source.path());
        Ok(items)
    }

    fn load_manifest(path: &Path) -> Result<Vec<ReelItem>> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {:?}", path))?;
        parse_manifest(&text, path.parent())
            .with_context(|| format!("Invalid manifest {:?}", path))
    }

    fn scan_directory(&self, dir: &Path) -> Result<Vec<ReelItem>> {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {:?}", dir);
        }

        let mut walker = WalkDir::new(dir).follow_links(self.config.follow_symlinks);
        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in walker.into_iter() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_video_path(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        debug!("Discovered {} video files in {:?}", paths.len(), dir);

        Ok(paths.iter().map(|path| reel_for_file(path)).collect())
    }
}

impl Default for ReelScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses manifest JSON into an ordered list, resolving relative sources
/// against `base_dir`.
pub fn parse_manifest(text: &str, base_dir: Option<&Path>) -> Result<Vec<ReelItem>> {
    let input: Option<ReelInput> =
        serde_json::from_str(text).context("Manifest is not null, a reel or a list of reels")?;
    let mut items = normalize(input);
    if let Some(base_dir) = base_dir {
        for item in &mut items {
            item.source_url = resolve_source(&item.source_url, base_dir);
        }
    }
    Ok(items)
}

/// Keeps URIs and absolute paths; joins relative paths onto `base_dir`.
fn resolve_source(source: &str, base_dir: &Path) -> String {
    if has_uri_scheme(source) || Path::new(source).is_absolute() {
        return source.to_string();
    }
    base_dir.join(source).to_string_lossy().into_owned()
}

fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn reel_for_file(path: &Path) -> ReelItem {
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let source = path.to_string_lossy().into_owned();
    let item = ReelItem::new(title, source.clone()).with_id(source);
    let description = fs::read_to_string(path.with_extension("txt"))
        .ok()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    match description {
        Some(text) => item.with_description(text),
        None => item,
    }
}
