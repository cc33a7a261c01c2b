//! Storage management for configuration and logs.
//!
//! All application data lives under `~/.config/irdeck/`:
//!
//! ```text
//! ~/.config/irdeck/
//!   config.ini          — User configuration (device URL, timeouts)
//!   irdeck.log          — Session log
//! ```
//!
//! Command and alias state is **never** stored here — the device is the
//! authoritative store and irdeck only keeps an in-memory snapshot of it.

use anyhow::{Context, Result};
use configparser::ini::Ini;
use std::fs;
use std::path::PathBuf;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Application configuration loaded from `~/.config/irdeck/config.ini`
#[derive(Debug, Clone)]
pub struct Config {
    // [device]
    /// Base URL of the IR blaster, e.g. http://192.168.4.1
    pub device_url: String,
    /// Timeout for ordinary requests, in seconds
    pub request_timeout_secs: u64,
    /// Timeout for learn requests, in seconds. A learn blocks until the user
    /// presses a button on the physical remote, so this is much longer.
    pub learn_timeout_secs: u64,

    // [ui]
    /// Ask for confirmation before deleting a command
    pub confirm_delete: bool,
}

impl Config {
    fn defaults() -> Self {
        Self {
            device_url: "http://192.168.4.1".to_string(),
            request_timeout_secs: 5,
            learn_timeout_secs: 60,
            confirm_delete: true,
        }
    }

    /// Load config from an INI file, falling back to defaults for missing keys.
    fn load_from_ini(path: &std::path::Path) -> Result<Self> {
        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let defaults = Config::defaults();

        let device_url = ini
            .get("device", "url")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.device_url);

        let request_timeout_secs = ini
            .getuint("device", "request_timeout_secs")
            .ok()
            .flatten()
            .unwrap_or(defaults.request_timeout_secs);

        let learn_timeout_secs = ini
            .getuint("device", "learn_timeout_secs")
            .ok()
            .flatten()
            .unwrap_or(defaults.learn_timeout_secs);

        let confirm_delete = ini
            .getbool("ui", "confirm_delete")
            .ok()
            .flatten()
            .unwrap_or(defaults.confirm_delete);

        Ok(Self {
            device_url,
            request_timeout_secs,
            learn_timeout_secs,
            confirm_delete,
        })
    }

    /// Save config to an INI-style file with comments explaining each field.
    fn save_to_ini(&self, path: &std::path::Path) -> Result<()> {
        let content = format!(
            r#"; irdeck — IR blaster remote configuration
; Location: {path}
;
; Edit this file to change default settings.
; Lines starting with ; or # are comments.

[device]
; Base URL of the IR blaster device.
; The ESP32 access point default is http://192.168.4.1
url = {url}

; Timeout for ordinary requests (list/send/rename/...), in seconds.
request_timeout_secs = {request_timeout}

; Timeout for learn requests, in seconds. A learn request blocks until
; you press a button on the physical remote, so keep this generous.
learn_timeout_secs = {learn_timeout}

[ui]
; Ask for confirmation before deleting a command (true/false)
confirm_delete = {confirm_delete}
"#,
            path = path.display(),
            url = self.device_url,
            request_timeout = self.request_timeout_secs,
            learn_timeout = self.learn_timeout_secs,
            confirm_delete = self.confirm_delete,
        );

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::defaults()
    }
}

/// Resolve the irdeck config directory to `~/.config/irdeck/` regardless of OS.
pub fn resolve_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("irdeck"))
}

// ─── Storage ─────────────────────────────────────────────────────────────────

/// Storage manager for configuration.
///
/// On construction it ensures the config directory exists and loads
/// `config.ini`, writing a commented default one on first run.
pub struct Storage {
    /// Base config directory (~/.config/irdeck)
    config_dir: PathBuf,
    /// Configuration
    pub config: Config,
}

impl Storage {
    /// Create a new storage manager.
    ///
    /// 1. Resolves the config directory (`~/.config/irdeck`).
    /// 2. Creates it if missing.
    /// 3. Loads `config.ini` if it exists, otherwise writes a default one.
    pub fn new() -> Result<Self> {
        let config_dir = resolve_config_dir()
            .context("Could not determine home directory (is $HOME set?)")?;

        let config_path = config_dir.join("config.ini");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config dir: {:?}", config_dir))?;
            tracing::info!("Created config directory: {:?}", config_dir);
        }

        let config = if config_path.exists() {
            tracing::info!("Loading config from {:?}", config_path);
            match Config::load_from_ini(&config_path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse config.ini, using defaults: {}", e);
                    Config::defaults()
                }
            }
        } else {
            tracing::info!("No config.ini found — creating default at {:?}", config_path);
            let config = Config::defaults();
            if let Err(e) = config.save_to_ini(&config_path) {
                tracing::warn!("Could not write default config.ini: {}", e);
            }
            config
        };

        tracing::info!("Config dir: {:?}", config_dir);
        tracing::info!("Device URL: {}", config.device_url);

        Ok(Self { config_dir, config })
    }

    /// Save the current configuration back to `config.ini`.
    pub fn save_config(&self) -> Result<()> {
        let config_path = self.config_dir.join("config.ini");
        self.config.save_to_ini(&config_path)?;
        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the config directory path (`~/.config/irdeck`)
    #[allow(dead_code)]
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults();
        assert_eq!(cfg.device_url, "http://192.168.4.1");
        assert!(cfg.learn_timeout_secs > cfg.request_timeout_secs);
        assert!(cfg.confirm_delete);
    }

    #[test]
    fn test_load_trims_trailing_slash() {
        let dir = std::env::temp_dir().join("irdeck_test_cfg");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("config.ini");
        fs::write(&path, "[device]\nurl = http://10.0.0.9/\n").unwrap();

        let cfg = Config::load_from_ini(&path).unwrap();
        assert_eq!(cfg.device_url, "http://10.0.0.9");
        // Missing keys fall back to defaults
        assert_eq!(cfg.request_timeout_secs, 5);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = std::env::temp_dir().join("irdeck_test_cfg_rt");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("config.ini");

        let mut cfg = Config::defaults();
        cfg.device_url = "http://192.168.1.50".to_string();
        cfg.learn_timeout_secs = 90;
        cfg.confirm_delete = false;
        cfg.save_to_ini(&path).unwrap();

        let loaded = Config::load_from_ini(&path).unwrap();
        assert_eq!(loaded.device_url, "http://192.168.1.50");
        assert_eq!(loaded.learn_timeout_secs, 90);
        assert!(!loaded.confirm_delete);

        let _ = fs::remove_file(&path);
    }
}
