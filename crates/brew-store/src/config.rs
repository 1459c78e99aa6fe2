//! # Storefront Configuration
//!
//! Configuration for the cart container: where the cart lives, where
//! promotions come from and how change events fan out.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     BREW_DATA_DIR=/var/lib/brew                                         │
//! │     BREW_CART_KEY=brew-cart                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/brew-cart/storefront.toml (Linux)                         │
//! │     ~/Library/Application Support/com.brew.brew-cart/storefront.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     file storage in the platform data dir, key "brew-cart"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [storage]
//! backend = "file"        # file | memory
//! data_dir = "/var/lib/brew"
//! cart_key = "brew-cart"
//!
//! [catalog]
//! promotions_path = "/var/lib/brew/promotions.json"
//!
//! [cart]
//! auto_promotions = true
//!
//! [events]
//! broadcast_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use brew_core::CART_STORAGE_KEY;

use crate::error::{StoreError, StoreResult};

/// File name looked up in the platform config dir.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Promotions file name inside the data dir.
pub const PROMOTIONS_FILE_NAME: &str = "promotions.json";

// =============================================================================
// Storage Backend
// =============================================================================

/// Where the cart is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One JSON file per key inside `data_dir`.
    #[default]
    File,

    /// Process memory only. Nothing survives a restart.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "disk" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown storage backend: '{}'. Valid options: file, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding the cart file. Platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Key the cart is stored under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            data_dir: None,
            cart_key: default_cart_key(),
        }
    }
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON array of promotion documents. `<data_dir>/promotions.json` when unset.
    #[serde(default)]
    pub promotions_path: Option<PathBuf>,
}

/// `[cart]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSettings {
    /// Re-run the auto promotion check after every line item change.
    #[serde(default = "default_true")]
    pub auto_promotions: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            auto_promotions: true,
        }
    }
}

/// `[events]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSettings {
    /// Events a slow subscriber may lag behind before it starts missing some.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_broadcast_capacity() -> usize {
    64
}

impl Default for EventSettings {
    fn default() -> Self {
        EventSettings {
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub events: EventSettings,
}

impl StorefrontConfig {
    /// Creates a config holding only defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        Self::load_with(config_path, |name| std::env::var(name).ok())
    }

    /// Same as [`StorefrontConfig::load`], reading `BREW_*` overrides through
    /// `lookup` instead of the process environment.
    pub fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(Self::fallback)
    }

    fn fallback(e: StoreError) -> Self {
        warn!("Failed to load storefront config: {}. Using defaults.", e);
        Self::default()
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let key = self.storage.cart_key.trim();
        if key.is_empty() {
            return Err(StoreError::InvalidConfig(
                "cart_key must not be empty".into(),
            ));
        }

        if key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(StoreError::InvalidConfig(format!(
                "cart_key must be a plain name, got: {}",
                self.storage.cart_key
            )));
        }

        if self.events.broadcast_capacity == 0 {
            return Err(StoreError::InvalidConfig(
                "broadcast_capacity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `BREW_*` overrides found by `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("BREW_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring BREW_STORAGE_BACKEND"),
            }
        }

        if let Some(dir) = lookup("BREW_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = lookup("BREW_CART_KEY") {
            debug!(cart_key = %key, "Overriding cart key from environment");
            self.storage.cart_key = key;
        }

        if let Some(path) = lookup("BREW_PROMOTIONS_PATH") {
            debug!(path = %path, "Overriding promotions path from environment");
            self.catalog.promotions_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("BREW_AUTO_PROMOTIONS") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.cart.auto_promotions = true,
                "0" | "false" | "no" | "off" => self.cart.auto_promotions = false,
                _ => warn!(value = %flag, "Ignoring BREW_AUTO_PROMOTIONS"),
            }
        }

        if let Some(capacity) = lookup("BREW_BROADCAST_CAPACITY") {
            if let Ok(c) = capacity.parse::<usize>() {
                debug!(capacity = c, "Overriding broadcast capacity from environment");
                self.events.broadcast_capacity = c;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "brew", "brew-cart")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved data directory.
    ///
    /// Falls back to `./.brew` when the platform has no data dir.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("com", "brew", "brew-cart")
                    .map(|dirs| dirs.data_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from(".brew"))
    }

    /// Resolved promotions file.
    pub fn promotions_path(&self) -> PathBuf {
        self.catalog
            .promotions_path
            .clone()
            .unwrap_or_else(|| self.data_dir().join(PROMOTIONS_FILE_NAME))
    }

    /// Key the cart is stored under.
    pub fn cart_key(&self) -> &str {
        self.storage.cart_key.trim()
    }
}
