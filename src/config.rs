use crate::translator::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const MIN_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_lang: String,
    pub poll_interval_ms: u64,
    pub notification_title: String,
    pub notification_timeout_secs: u64,
    pub translate_endpoint: String,
    pub request_timeout_secs: u64,
    pub autostart: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_lang: "english".to_string(),
            poll_interval_ms: 1000,
            notification_title: "Translation".to_string(),
            notification_timeout_secs: 10,
            translate_endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 30,
            autostart: false,
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
        let dir = exe.parent().unwrap_or(Path::new("."));
        dir.join("config.json")
    }

    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Missing file means defaults; an unreadable one is reported and ignored.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str::<Config>(&s).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Apply `TARGET_LANG`, `CLIPTRANS_POLL_MS`, `CLIPTRANS_ENDPOINT` and
    /// `CLIPTRANS_AUTOSTART` from `var`. Empty or unparsable values are ignored.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("TARGET_LANG") {
            self.target_lang = v;
        }
        if let Some(v) = var("CLIPTRANS_POLL_MS") {
            match v.trim().parse() {
                Ok(ms) => self.poll_interval_ms = ms,
                Err(_) => warn!(value = %v, "ignoring CLIPTRANS_POLL_MS"),
            }
        }
        if let Some(v) = var("CLIPTRANS_ENDPOINT") {
            self.translate_endpoint = v;
        }
        if let Some(v) = var("CLIPTRANS_AUTOSTART") {
            self.autostart = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.json"));
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
        assert_eq!(cfg.notification_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "target_lang": "french", "autostart": true }}"#).unwrap();

        let cfg = Config::load_from(file.path());
        assert_eq!(cfg.target_lang, "french");
        assert!(cfg.autostart);
        assert_eq!(cfg.poll_interval_ms, 1000);
        assert_eq!(cfg.translate_endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "target_lang = french").unwrap();
        assert_eq!(Config::load_from(file.path()), Config::default());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("TARGET_LANG", "japanese"),
            ("CLIPTRANS_POLL_MS", "250"),
            ("CLIPTRANS_AUTOSTART", "yes"),
            ("CLIPTRANS_ENDPOINT", ""),
        ]
        .into_iter()
        .collect();

        let mut cfg = Config::default();
        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.target_lang, "japanese");
        assert_eq!(cfg.poll_interval_ms, 250);
        assert!(cfg.autostart);
        assert_eq!(cfg.translate_endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn bad_poll_override_is_ignored() {
        let mut cfg = Config::default();
        cfg.apply_overrides(|key| (key == "CLIPTRANS_POLL_MS").then(|| "soon".to_string()));
        assert_eq!(cfg.poll_interval_ms, 1000);
    }

    #[test]
    fn poll_interval_has_a_floor() {
        let cfg = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };
        assert_eq!(cfg.poll_interval(), Duration::from_millis(MIN_POLL_INTERVAL_MS));
    }
}
