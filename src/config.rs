use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chatbook_common::list::ListConfig;

use crate::error::{ChatbookError, Result};

/// RGB color values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Theme color palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    /// Secondary text: previews, timestamps, hints
    pub muted: Rgb,
    /// Confirmations and own messages
    pub success: Rgb,
    /// Loading indicator and search filter
    pub warning: Rgb,
    /// Failed loads and destructive prompts
    pub error: Rgb,
    /// Titles and the other party's messages
    pub info: Rgb,
    /// Active conversation accent
    pub accent: Rgb,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            muted: Rgb::new(140, 140, 140),
            success: Rgb::new(134, 239, 172),
            warning: Rgb::new(253, 224, 71),
            error: Rgb::new(252, 129, 129),
            info: Rgb::new(147, 197, 253),
            accent: Rgb::new(216, 180, 254),
        }
    }
}

impl ThemeColors {
    /// Catppuccin Mocha theme
    pub fn catppuccin_mocha() -> Self {
        Self {
            muted: Rgb::new(166, 173, 200),   // Subtext0
            success: Rgb::new(166, 227, 161), // Green
            warning: Rgb::new(249, 226, 175), // Yellow
            error: Rgb::new(243, 139, 168),   // Red
            info: Rgb::new(137, 180, 250),    // Blue
            accent: Rgb::new(203, 166, 247),  // Mauve
        }
    }

    /// Catppuccin Latte theme (light theme)
    pub fn catppuccin_latte() -> Self {
        Self {
            muted: Rgb::new(108, 111, 133),  // Subtext0
            success: Rgb::new(64, 160, 43),  // Green
            warning: Rgb::new(223, 142, 29), // Yellow
            error: Rgb::new(210, 15, 57),    // Red
            info: Rgb::new(30, 102, 245),    // Blue
            accent: Rgb::new(136, 57, 239),  // Mauve
        }
    }

    /// High contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            muted: Rgb::new(200, 200, 200),
            success: Rgb::new(0, 255, 0),
            warning: Rgb::new(255, 255, 0),
            error: Rgb::new(255, 0, 0),
            info: Rgb::new(0, 255, 255),
            accent: Rgb::new(255, 0, 255),
        }
    }

    /// Get theme by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "default" => Some(Self::default()),
            "catppuccinmocha" => Some(Self::catppuccin_mocha()),
            "catppuccinlatte" => Some(Self::catppuccin_latte()),
            "highcontrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }
}

/// Theme configuration - either a preset name or custom colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeConfig {
    Preset(String),
    Custom(ThemeColors),
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig::Preset("default".to_string())
    }
}

impl ThemeConfig {
    /// Resolve to actual theme colors
    pub fn resolve(&self) -> ThemeColors {
        match self {
            ThemeConfig::Preset(name) => ThemeColors::from_name(name).unwrap_or_default(),
            ThemeConfig::Custom(colors) => colors.clone(),
        }
    }
}

/// Simulated backend behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockConfig {
    /// Random conversations generated after the two fixed ones
    pub initial_chats: usize,
    /// Delay before a batch fetch resolves
    pub fetch_latency_ms: u64,
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
    /// Probability in `[0, 1]` that a batch fetch fails
    pub failure_rate: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            initial_chats: 12,
            fetch_latency_ms: 300,
            reply_delay_min_ms: 600,
            reply_delay_max_ms: 1600,
            failure_rate: 0.0,
        }
    }
}

impl MockConfig {
    pub fn fetch_latency(&self) -> Duration {
        Duration::from_millis(self.fetch_latency_ms)
    }

    pub fn reply_delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.reply_delay_min_ms),
            Duration::from_millis(self.reply_delay_max_ms),
        )
    }
}

/// List tuning for a terminal, where one unit is one cell row.
pub fn terminal_list_config() -> ListConfig {
    ListConfig {
        row_height: 3.0,
        bottom_threshold: 2.0,
        gate_threshold: 0.0,
        user_scroll_threshold: 0.0,
        resize_hysteresis: 0.0,
        ..ListConfig::default()
    }
}

/// A `list` section as written in the file. Fields left out keep their
/// terminal values.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListOverrides {
    row_height: Option<f32>,
    overscan: Option<usize>,
    batch_size: Option<usize>,
    ceiling: Option<usize>,
    settle_delay_ms: Option<u64>,
    rearm_delay_ms: Option<u64>,
    bottom_threshold: Option<f32>,
    gate_threshold: Option<f32>,
    user_scroll_threshold: Option<f32>,
    resize_hysteresis: Option<f32>,
}

impl ListOverrides {
    fn apply(self, base: ListConfig) -> ListConfig {
        ListConfig {
            row_height: self.row_height.unwrap_or(base.row_height),
            overscan: self.overscan.unwrap_or(base.overscan),
            batch_size: self.batch_size.unwrap_or(base.batch_size),
            ceiling: self.ceiling.unwrap_or(base.ceiling),
            settle_delay_ms: self.settle_delay_ms.unwrap_or(base.settle_delay_ms),
            rearm_delay_ms: self.rearm_delay_ms.unwrap_or(base.rearm_delay_ms),
            bottom_threshold: self.bottom_threshold.unwrap_or(base.bottom_threshold),
            gate_threshold: self.gate_threshold.unwrap_or(base.gate_threshold),
            user_scroll_threshold: self
                .user_scroll_threshold
                .unwrap_or(base.user_scroll_threshold),
            resize_hysteresis: self.resize_hysteresis.unwrap_or(base.resize_hysteresis),
        }
    }
}

fn deserialize_list<'de, D>(deserializer: D) -> std::result::Result<ListConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = ListOverrides::deserialize(deserializer)?;
    Ok(overrides.apply(terminal_list_config()))
}

/// Configuration settings for chatbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default = "terminal_list_config", deserialize_with = "deserialize_list")]
    pub list: ListConfig,

    #[serde(default)]
    pub mock: MockConfig,

    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_tick_rate_ms() -> u64 {
    50
}

fn default_search_debounce_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeConfig::default(),
            list: terminal_list_config(),
            mock: MockConfig::default(),
            tick_rate_ms: default_tick_rate_ms(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl Config {
    /// Get the config file path (~/.chatbook.json)
    pub fn config_file_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".chatbook.json"))
            .ok_or_else(|| ChatbookError::Config("could not find home directory".to_string()))
    }

    /// Ensure the config file exists, creating it with defaults if not
    fn ensure_config_file(path: &Path) -> Result<()> {
        if !path.exists() {
            let data = serde_json::to_string_pretty(&Config::default())?;
            fs::write(path, data)?;
        }
        Ok(())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::ensure_config_file(path)?;
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration, falling back to defaults with a warning on failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        match loaded {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Warning: failed to load config: {err}, using defaults");
                Self::default()
            }
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
