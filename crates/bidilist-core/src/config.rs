use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level, used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Edge-reach and position-maintenance settings for the bidirectional list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Distance from the top (in rows) below which `on_start_reached` fires
    #[serde(default = "default_reach_threshold")]
    pub on_start_reached_threshold: f64,
    /// Distance from the bottom (in rows) below which `on_end_reached` fires
    #[serde(default = "default_reach_threshold")]
    pub on_end_reached_threshold: f64,
    /// Scroll back to the top when content is prepended while near the top
    #[serde(default)]
    pub enable_autoscroll_to_top: bool,
    /// Offset below which auto scrolling to the top kicks in
    #[serde(default = "default_autoscroll_to_top_threshold")]
    pub autoscroll_to_top_threshold: f64,
    /// First item index eligible as the anchor when maintaining position
    #[serde(default = "default_min_index_for_visible")]
    pub min_index_for_visible: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            on_start_reached_threshold: default_reach_threshold(),
            on_end_reached_threshold: default_reach_threshold(),
            enable_autoscroll_to_top: false,
            autoscroll_to_top_threshold: default_autoscroll_to_top_threshold(),
            min_index_for_visible: default_min_index_for_visible(),
        }
    }
}

/// Where the demo pulls its pages from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Synthetic,
    Http,
}

impl std::str::FromStr for SourceKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "synthetic" => Ok(SourceKind::Synthetic),
            "http" => Ok(SourceKind::Http),
            other => Err(crate::Error::Config(format!("Unknown source kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Paged JSON endpoint, queried with `?page=N&per_page=M`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Page shown first; pages before it are loaded by scrolling up
    #[serde(default = "default_start_page")]
    pub start_page: u32,
    /// Number of pages the synthetic source serves
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Artificial delay of the synthetic source in milliseconds
    #[serde(default = "default_latency")]
    pub latency_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            endpoint: default_endpoint(),
            per_page: default_per_page(),
            start_page: default_start_page(),
            total_pages: default_total_pages(),
            request_timeout_secs: default_timeout(),
            latency_ms: default_latency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Rows drawn per list item
    #[serde(default = "default_row_height")]
    pub row_height: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            row_height: default_row_height(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bidilist")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reach_threshold() -> f64 {
    10.0
}

fn default_autoscroll_to_top_threshold() -> f64 {
    100.0
}

fn default_min_index_for_visible() -> usize {
    1
}

fn default_endpoint() -> String {
    "https://api.punkapi.com/v2/beers".to_string()
}

fn default_per_page() -> u32 {
    15
}

fn default_start_page() -> u32 {
    2
}

fn default_total_pages() -> u32 {
    10
}

fn default_timeout() -> u64 {
    30
}

fn default_latency() -> u64 {
    300
}

fn default_tick_rate() -> u64 {
    100
}

fn default_row_height() -> u16 {
    3
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults if it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/bidilist/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("bidilist")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("bidilist.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.list, ListConfig::default());
        assert_eq!(config.list.on_start_reached_threshold, 10.0);
        assert_eq!(config.list.on_end_reached_threshold, 10.0);
        assert!(!config.list.enable_autoscroll_to_top);
        assert_eq!(config.list.autoscroll_to_top_threshold, 100.0);
        assert_eq!(config.list.min_index_for_visible, 1);
        assert_eq!(config.source.kind, SourceKind::Synthetic);
        assert_eq!(config.source.per_page, 15);
        assert_eq!(config.source.start_page, 2);
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [list]
            enable_autoscroll_to_top = true
            on_end_reached_threshold = 4.0

            [source]
            kind = "http"
            "#,
        )
        .unwrap();
        assert!(config.list.enable_autoscroll_to_top);
        assert_eq!(config.list.on_end_reached_threshold, 4.0);
        assert_eq!(config.list.on_start_reached_threshold, 10.0);
        assert_eq!(config.source.kind, SourceKind::Http);
        assert_eq!(config.source.endpoint, "https://api.punkapi.com/v2/beers");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[list\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_round_trip_preserves_list_section() {
        let mut config = AppConfig::default();
        config.list.min_index_for_visible = 3;
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.list.min_index_for_visible, 3);
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("HTTP".parse::<SourceKind>().unwrap(), SourceKind::Http);
        assert_eq!("synthetic".parse::<SourceKind>().unwrap(), SourceKind::Synthetic);
        assert!("ftp".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        let path = std::path::Path::new("/tmp/bidilist");
        assert_eq!(expand_tilde(path), PathBuf::from("/tmp/bidilist"));
    }
}
