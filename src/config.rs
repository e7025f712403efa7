use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::tab::TabIdentifier;

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub socket: PathBuf,
    /// This window's own identifier, announced in the hello message.
    pub window: Option<TabIdentifier>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            socket: default_socket_path(),
            window: None,
        }
    }
}

/// Returns $TMPDIR/tabstrip-{uid}/layouts.sock or /tmp/tabstrip-{uid}/layouts.sock
pub fn default_socket_path() -> PathBuf {
    let uid = nix::unistd::getuid();
    let base = std::env::var("TMPDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"));
    base.join(format!("tabstrip-{}", uid)).join("layouts.sock")
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct TitleConfig {
    pub separator: String,
    /// Title shown while the group has no members.
    pub empty: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            separator: ", ".to_string(),
            empty: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ChromeConfig {
    pub minimize_key: char,
    pub maximize_key: char,
    pub close_key: char,
    pub restore_class: String,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            minimize_key: 'n',
            maximize_key: 'm',
            close_key: 'q',
            restore_class: "restore".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Config {
    pub service: ServiceConfig,
    pub title: TitleConfig,
    pub chrome: ChromeConfig,
    pub log_level: String,
    /// Log file used while the interactive client owns the terminal.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            title: TitleConfig::default(),
            chrome: ChromeConfig::default(),
            log_level: "info".to_string(),
            log_file: default_log_file(),
        }
    }
}

/// Returns ~/.cache/tabstrip/tabstrip.log, or ./tabstrip.log without a cache dir.
pub fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("tabstrip"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabstrip.log")
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("tabstrip").join("config.toml"))
        .unwrap_or_default()
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Missing or invalid files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };

        match Self::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                // Logging is not up yet; it is configured from this file.
                eprintln!("tabstrip: invalid config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Self::default();

        if let Some(s) = raw.service {
            if let Some(v) = s.socket {
                config.service.socket = v;
            }
            if let (Some(name), Some(uuid)) = (s.window_name, s.window_uuid) {
                config.service.window = Some(TabIdentifier::new(name, uuid));
            }
        }

        if let Some(t) = raw.title {
            if let Some(v) = t.separator {
                config.title.separator = v;
            }
            if let Some(v) = t.empty {
                config.title.empty = v;
            }
        }

        if let Some(k) = raw.keys {
            if let Some(c) = k.minimize.as_deref().and_then(parse_key) {
                config.chrome.minimize_key = c;
            }
            if let Some(c) = k.maximize.as_deref().and_then(parse_key) {
                config.chrome.maximize_key = c;
            }
            if let Some(c) = k.close.as_deref().and_then(parse_key) {
                config.chrome.close_key = c;
            }
        }

        if let Some(c) = raw.chrome {
            if let Some(v) = c.restore_class {
                config.chrome.restore_class = v;
            }
        }

        if let Some(l) = raw.log {
            if let Some(v) = l.level {
                config.log_level = v;
            }
            if let Some(v) = l.file {
                config.log_file = v;
            }
        }

        config
    }
}

/// A key binding is exactly one character.
fn parse_key(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Raw TOML shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    service: Option<RawService>,
    title: Option<RawTitle>,
    keys: Option<RawKeys>,
    chrome: Option<RawChrome>,
    log: Option<RawLog>,
}

#[derive(Debug, Default, Deserialize)]
struct RawService {
    socket: Option<PathBuf>,
    window_name: Option<String>,
    window_uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTitle {
    separator: Option<String>,
    empty: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawKeys {
    minimize: Option<String>,
    maximize: Option<String>,
    close: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawChrome {
    restore_class: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLog {
    level: Option<String>,
    file: Option<PathBuf>,
}
