/*
 *  config.rs
 *
 *  vestaglove - controller log display
 *	(c) 2026 vestaglove contributors
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::*;
use crate::discovery::ScanTarget;
use crate::display::TextLayout;
use crate::mode::ModeEndpoints;
use crate::runloop::RunSettings;
use crate::wifi::WifiCredentials;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Optional configuration as read from YAML. Anything left out falls back
/// to the compiled-in defaults in `constants.rs`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,
    pub log_retention: Option<usize>,
    pub wifi: Option<WifiConfig>,
    pub peer: Option<PeerConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WifiConfig {
    pub ssid: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PeerConfig {
    pub service_id: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub rotate_deg: Option<u16>,
    pub driver: Option<DriverKind>,
    pub fb_device: Option<String>,
    pub font_scale: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Linux framebuffer device
    Fbdev,
    /// No panel, frames kept in memory
    Headless,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "vestaglove", version, about = "Controller log display")]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Enable debug log level
    #[arg(short = 'v', long, alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long)]
    pub ssid: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub hostname: Option<String>,
    /// Network interface to read the address from
    #[arg(long)]
    pub interface: Option<String>,
    /// Service identifier the controller must advertise
    #[arg(long)]
    pub service_id: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long, value_enum)]
    pub driver: Option<DriverKind>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub fb_device: Option<String>,
    #[arg(long)]
    pub rotate: Option<u16>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Fully resolved settings handed to the run loop.
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_level: String,
    pub log_retention: usize,
    pub wifi: WifiCredentials,
    pub interface: Option<String>,
    pub service_id: String,
    pub port: u16,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub width: u32,
    pub height: u32,
    pub rotate_deg: u16,
    pub driver: DriverKind,
    pub fb_device: String,
    pub font_scale: u32,
}

impl Settings {
    pub fn scan_target(&self) -> ScanTarget {
        ScanTarget {
            service_id: self.service_id.clone(),
            port: self.port,
            path: DISCOVER_PATH.to_string(),
            timeout: DISCOVERY_TIMEOUT,
        }
    }

    pub fn mode_endpoints(&self) -> ModeEndpoints {
        ModeEndpoints {
            port: self.port,
            mode_path: MODE_PATH.to_string(),
            mode_timeout: MODE_TIMEOUT,
            demo_path: DEMO_LINES_PATH.to_string(),
            demo_timeout: DEMO_FETCH_TIMEOUT,
            demo_period: DEMO_POLL_PERIOD,
            demo_start_delay: DEMO_START_DELAY,
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings::new(self.wifi.clone(), self.scan_target(), self.mode_endpoints())
    }

    pub fn text_layout(&self) -> TextLayout {
        TextLayout { scale: self.display.font_scale, ..TextLayout::default() }
    }
}

/// Result of `load`: what to run with, and whether only a dump was asked for.
pub struct Loaded {
    pub config: Config,
    pub settings: Settings,
    pub dump_only: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Loaded, ConfigError> {
    let cli = Cli::parse();
    load_with(&cli)
}

pub fn load_with(cli: &Cli) -> Result<Loaded, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate and resolve
    validate(&cfg)?;
    let settings = resolve(&cfg);

    Ok(Loaded { config: cfg, settings, dump_only: cli.dump_config })
}

/// CLI overrides on top of the compiled-in defaults, no file lookup.
pub fn from_cli(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut cfg = Config::default();
    apply_cli_overrides(&mut cfg, cli);
    validate(&cfg)?;
    Ok(resolve(&cfg))
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/vestaglove/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/vestaglove/config.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["vestaglove.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(s)?)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.log_retention.is_some()  { dst.log_retention = src.log_retention; }
    if src.wifi.is_some()           { dst.wifi = src.wifi; }
    if src.peer.is_some()           { dst.peer = src.peer; }
    if src.display.is_some()        { dst.display = src.display; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.debug { cfg.log_level = Some("debug".to_string()); }

    let wifi = cfg.wifi.get_or_insert_with(WifiConfig::default);
    if cli.ssid.is_some()      { wifi.ssid = cli.ssid.clone(); }
    if cli.password.is_some()  { wifi.password = cli.password.clone(); }
    if cli.hostname.is_some()  { wifi.hostname = cli.hostname.clone(); }
    if cli.interface.is_some() { wifi.interface = cli.interface.clone(); }

    let peer = cfg.peer.get_or_insert_with(PeerConfig::default);
    if cli.service_id.is_some() { peer.service_id = cli.service_id.clone(); }
    if cli.port.is_some()       { peer.port = cli.port; }

    let display = cfg.display.get_or_insert_with(DisplayConfig::default);
    if cli.driver.is_some()    { display.driver = cli.driver; }
    if cli.fb_device.is_some() { display.fb_device = cli.fb_device.clone(); }
    if cli.rotate.is_some()    { display.rotate_deg = cli.rotate; }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.log_retention == Some(0) {
        return Err(ConfigError::Validation("log_retention must be > 0".into()));
    }
    if let Some(peer) = cfg.peer.as_ref() {
        if peer.port == Some(0) {
            return Err(ConfigError::Validation("peer port must be > 0".into()));
        }
        if peer.service_id.as_deref() == Some("") {
            return Err(ConfigError::Validation("peer service_id must not be empty".into()));
        }
    }
    if let Some(display) = cfg.display.as_ref() {
        if display.width == Some(0) || display.height == Some(0) {
            return Err(ConfigError::Validation("display width/height must be > 0".into()));
        }
        if display.font_scale == Some(0) {
            return Err(ConfigError::Validation("display font_scale must be > 0".into()));
        }
        if let Some(rot) = display.rotate_deg {
            match rot {
                0 | 90 | 180 | 270 => {},
                _ => return Err(ConfigError::Validation("display rotate_deg must be 0|90|180|270".into()))
            }
        }
    }
    Ok(())
}

/// Fill every gap with the compiled-in default.
fn resolve(cfg: &Config) -> Settings {
    let wifi = cfg.wifi.clone().unwrap_or_default();
    let peer = cfg.peer.clone().unwrap_or_default();
    let display = cfg.display.clone().unwrap_or_default();

    Settings {
        log_level: cfg.log_level.clone().unwrap_or_else(|| "info".to_string()),
        log_retention: cfg.log_retention.unwrap_or(LOG_LINE_RETENTION),
        wifi: WifiCredentials {
            ssid: wifi.ssid.unwrap_or_else(|| WIFI_SSID.to_string()),
            password: wifi.password.unwrap_or_else(|| WIFI_PASSWORD.to_string()),
            hostname: wifi.hostname.unwrap_or_else(|| DEVICE_HOSTNAME.to_string()),
        },
        interface: wifi.interface,
        service_id: peer.service_id.unwrap_or_else(|| CONTROLLER_ID.to_string()),
        port: peer.port.unwrap_or(PEER_PORT),
        display: DisplaySettings {
            width: display.width.unwrap_or(SCREEN_WIDTH),
            height: display.height.unwrap_or(SCREEN_HEIGHT),
            rotate_deg: display.rotate_deg.unwrap_or(SCREEN_ROTATE),
            driver: display.driver.unwrap_or(DriverKind::Fbdev),
            fb_device: display.fb_device.unwrap_or_else(|| FB_DEVICE.to_string()),
            font_scale: display.font_scale.unwrap_or(LOG_FONT_SCALE),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from(yaml: &str, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut cfg = Config::default();
        merge(&mut cfg, parse_yaml(yaml)?);
        apply_cli_overrides(&mut cfg, cli);
        validate(&cfg)?;
        Ok(resolve(&cfg))
    }

    #[test]
    fn test_defaults_match_constants() {
        let s = settings_from("{}", &Cli::default()).unwrap();
        assert_eq!(s.wifi.ssid, "vesta");
        assert_eq!(s.wifi.hostname, "vestaglove");
        assert_eq!(s.service_id, "vesta");
        assert_eq!(s.port, 10000);
        assert_eq!(s.log_retention, 20);
        assert_eq!(s.display.rotate_deg, 180);
        assert_eq!(s.display.driver, DriverKind::Fbdev);
        assert_eq!(s.log_level, "info");
        assert_eq!(s.text_layout().scale, 1);
        let run = s.run_settings();
        assert_eq!(run.scan.path, "/discover");
        assert_eq!(run.endpoints.demo_path, "/run/demo/lines");
        assert_eq!(run.idle_period, std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_yaml_then_cli_precedence() {
        let yaml = "peer:\n  service_id: hestia\n  port: 9000\ndisplay:\n  driver: headless\n";
        let cli = Cli { port: Some(10001), debug: true, ..Default::default() };
        let s = settings_from(yaml, &cli).unwrap();
        assert_eq!(s.service_id, "hestia");
        assert_eq!(s.port, 10001);
        assert_eq!(s.display.driver, DriverKind::Headless);
        assert_eq!(s.log_level, "debug");
    }

    #[test]
    fn test_bad_rotation_rejected() {
        let cli = Cli { rotate: Some(45), ..Default::default() };
        assert!(matches!(settings_from("{}", &cli), Err(ConfigError::Validation(_))));
        assert!(from_cli(&cli).is_err());
    }

    #[test]
    fn test_from_cli_skips_files() {
        let cli = Cli { service_id: Some("hestia".into()), ..Default::default() };
        let s = from_cli(&cli).unwrap();
        assert_eq!(s.service_id, "hestia");
        assert_eq!(s.port, 10000);
    }

    #[test]
    fn test_zero_retention_rejected() {
        assert!(settings_from("log_retention: 0\n", &Cli::default()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let cli = Cli { config: Some(PathBuf::from("/nonexistent/vestaglove.yaml")), ..Default::default() };
        assert!(matches!(load_with(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_explicit_file_is_read() {
        let path = std::env::temp_dir().join(format!("vestaglove-cfg-{}.yaml", std::process::id()));
        fs::write(&path, "wifi:\n  ssid: lab\n").unwrap();
        let cli = Cli { config: Some(path.clone()), ..Default::default() };

        let loaded = load_with(&cli).unwrap();
        assert_eq!(loaded.settings.wifi.ssid, "lab");
        assert_eq!(loaded.settings.wifi.password, "vestavesta");
        assert!(!loaded.dump_only);
        fs::remove_file(&path).ok();
    }
}
