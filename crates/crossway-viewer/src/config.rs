//! Layered viewer configuration
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Command-line flags (merged in by the binary)
//! 2. Environment variable: `CROSSWAY_SERVER_URL`
//! 3. Project-local: `.crossway/config.toml`
//! 4. Global: `~/.crossway/config.toml`

use crossway_core::{CrosswayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_SERVER_URL: &str = "http://localhost:8585";
const DEFAULT_MAP_FILE: &str = "public/2021_base.txt";
const DEFAULT_MAP_DICT: &str = "public/mapDictionary.json";
const DEFAULT_POLL_FRAMES: u32 = 30;
const DEFAULT_SEED: u32 = 42;

/// Simulation server section of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub map_file: Option<String>,
    #[serde(default)]
    pub map_dict: Option<String>,
}

/// Viewer behavior section of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerSection {
    /// Frames between server polls
    #[serde(default)]
    pub poll_frames: Option<u32>,
    /// Frames a position update is interpolated over
    #[serde(default)]
    pub cycle_frames: Option<u32>,
    /// Seed for stable vehicle colors and building heights
    #[serde(default)]
    pub seed: Option<u32>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub viewer: ViewerSection,
}

/// Resolved configuration with every layer applied
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub server_url: String,
    pub map_file: String,
    pub map_dict: String,
    pub poll_frames: u32,
    pub cycle_frames: u32,
    pub seed: u32,
    pub fullscreen: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            map_file: DEFAULT_MAP_FILE.to_string(),
            map_dict: DEFAULT_MAP_DICT.to_string(),
            poll_frames: DEFAULT_POLL_FRAMES,
            cycle_frames: crossway_scene::DEFAULT_CYCLE_FRAMES,
            seed: DEFAULT_SEED,
            fullscreen: false,
        }
    }
}

impl ViewerConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut file = ViewerConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                merge_into(&mut file, Self::load_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(".crossway/config.toml");
        if local_path.exists() {
            merge_into(&mut file, Self::load_file(&local_path)?);
        }

        let mut config = Self::from_file_layers(file);
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from a specific file path only (for testing and the
    /// --config flag)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let file = Self::load_file(path)?;
        let mut config = Self::from_file_layers(file);
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file_layers(file: ViewerConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            server_url: file.server.url.unwrap_or(defaults.server_url),
            map_file: file.server.map_file.unwrap_or(defaults.map_file),
            map_dict: file.server.map_dict.unwrap_or(defaults.map_dict),
            poll_frames: file.viewer.poll_frames.unwrap_or(defaults.poll_frames),
            cycle_frames: file.viewer.cycle_frames.unwrap_or(defaults.cycle_frames),
            seed: file.viewer.seed.unwrap_or(defaults.seed),
            fullscreen: false,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CROSSWAY_SERVER_URL") {
            if !url.is_empty() {
                self.server_url = url;
            }
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".crossway").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ViewerConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            CrosswayError::ConfigError(format!("failed to parse {}: {}", path.display(), e))
        })
    }
}

fn merge_into(base: &mut ViewerConfigFile, overlay: ViewerConfigFile) {
    if overlay.server.url.is_some() {
        base.server.url = overlay.server.url;
    }
    if overlay.server.map_file.is_some() {
        base.server.map_file = overlay.server.map_file;
    }
    if overlay.server.map_dict.is_some() {
        base.server.map_dict = overlay.server.map_dict;
    }
    if overlay.viewer.poll_frames.is_some() {
        base.viewer.poll_frames = overlay.viewer.poll_frames;
    }
    if overlay.viewer.cycle_frames.is_some() {
        base.viewer.cycle_frames = overlay.viewer.cycle_frames;
    }
    if overlay.viewer.seed.is_some() {
        base.viewer.seed = overlay.viewer.seed;
    }
}
