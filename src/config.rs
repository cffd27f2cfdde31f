//! Config file loading: a deliberately small line-oriented parser for a
//! subset of YAML (`key: value` pairs under two-space-indented sections,
//! no lists, no anchors) rather than a full YAML document model, since
//! that's all the on-disk format ever uses.

use crate::error::ConfigError;
use crate::scancode::Scancode;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoSwitchConfig {
    pub enabled: bool,
    pub min_word_len: usize,
    pub min_score: f64,
    pub threshold: f64,
}

impl Default for AutoSwitchConfig {
    fn default() -> Self {
        AutoSwitchConfig {
            enabled: true,
            min_word_len: 2,
            min_score: 1.0,
            threshold: 1.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayConfig {
    pub key_press: Duration,
    pub layout_switch: Duration,
    pub retype: Duration,
    pub turbo_key_press: Duration,
    pub turbo_retype: Duration,
}

impl Default for DelayConfig {
    fn default() -> Self {
        DelayConfig {
            key_press: Duration::from_millis(15),
            layout_switch: Duration::from_millis(60),
            retype: Duration::from_millis(10),
            turbo_key_press: Duration::from_millis(2),
            turbo_retype: Duration::from_millis(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyConfig {
    pub modifier: Scancode,
    pub key: Scancode,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        HotkeyConfig {
            modifier: crate::scancode::KEY_LEFTCTRL,
            key: crate::scancode::KEY_PAUSE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoundConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfigSnapshot {
    pub auto_switch: AutoSwitchConfig,
    pub delays: DelayConfig,
    pub hotkey: HotkeyConfig,
    pub sound: SoundConfig,
}

/// Tries `$HOME/.config/layoutguard/config.yaml` first, then
/// `/etc/layoutguard/config.yaml`. A missing file at both paths is not an
/// error: the caller gets built-in defaults, matching the original's
/// "absent config means defaults" behaviour.
pub fn default_search_paths(home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = home {
        paths.push(home.join(".config/layoutguard/config.yaml"));
    }
    paths.push(PathBuf::from("/etc/layoutguard/config.yaml"));
    paths
}

pub fn load(home: Option<&Path>) -> Result<ConfigSnapshot, ConfigError> {
    for path in default_search_paths(home) {
        match std::fs::read_to_string(&path) {
            Ok(text) => return parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        }
    }
    Ok(ConfigSnapshot::default())
}

pub fn load_path(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&text)
}

fn trim(s: &str) -> &str {
    s.trim()
}

fn parse_int(line_no: usize, value: &str) -> Result<i64, ConfigError> {
    trim(value)
        .parse::<i64>()
        .map_err(|_| ConfigError::Parse {
            line: line_no,
            message: format!("expected an integer, got '{value}'"),
        })
}

fn parse_float(line_no: usize, value: &str) -> Result<f64, ConfigError> {
    trim(value)
        .parse::<f64>()
        .map_err(|_| ConfigError::Parse {
            line: line_no,
            message: format!("expected a number, got '{value}'"),
        })
}

fn parse_bool(line_no: usize, value: &str) -> Result<bool, ConfigError> {
    match trim(value) {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(ConfigError::Parse {
            line: line_no,
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn parse_delay_ms(line_no: usize, value: &str) -> Result<Duration, ConfigError> {
    let ms = parse_int(line_no, value)?;
    if ms <= 0 {
        return Err(ConfigError::InvalidValue {
            field: "delay".to_string(),
            value: value.to_string(),
        });
    }
    Ok(Duration::from_millis(ms as u64))
}

#[derive(PartialEq, Eq)]
enum Section {
    None,
    AutoSwitch,
    Delays,
    Hotkey,
    Sound,
}

/// Parses the flat two-level format: a top-level `section:` line opens a
/// section, and subsequent two-space-indented `key: value` lines set
/// fields within it. Unrecognised sections and keys are ignored rather
/// than rejected, so older daemons can read newer config files.
pub fn parse(text: &str) -> Result<ConfigSnapshot, ConfigError> {
    let mut cfg = ConfigSnapshot::default();
    let mut section = Section::None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw_line.trim().is_empty() || raw_line.trim_start().starts_with('#') {
            continue;
        }

        if !raw_line.starts_with(' ') {
            let header = raw_line.trim_end().trim_end_matches(':');
            section = match header {
                "auto_switch" => Section::AutoSwitch,
                "delays" => Section::Delays,
                "hotkey" => Section::Hotkey,
                "sound" => Section::Sound,
                _ => Section::None,
            };
            continue;
        }

        let Some((key, value)) = raw_line.split_once(':') else {
            continue;
        };
        let key = trim(key);
        let value = trim(value);

        match section {
            Section::AutoSwitch => match key {
                "enabled" => cfg.auto_switch.enabled = parse_bool(line_no, value)?,
                "min_word_len" => {
                    cfg.auto_switch.min_word_len = parse_int(line_no, value)?.max(1) as usize
                }
                "min_score" => cfg.auto_switch.min_score = parse_float(line_no, value)?,
                "threshold" => cfg.auto_switch.threshold = parse_float(line_no, value)?,
                _ => {}
            },
            Section::Delays => match key {
                "key_press" => cfg.delays.key_press = parse_delay_ms(line_no, value)?,
                "layout_switch" => cfg.delays.layout_switch = parse_delay_ms(line_no, value)?,
                "retype" => cfg.delays.retype = parse_delay_ms(line_no, value)?,
                "turbo_key_press" => cfg.delays.turbo_key_press = parse_delay_ms(line_no, value)?,
                "turbo_retype" => cfg.delays.turbo_retype = parse_delay_ms(line_no, value)?,
                _ => {}
            },
            Section::Hotkey => match key {
                "modifier" => cfg.hotkey.modifier = parse_int(line_no, value)?.max(0) as Scancode,
                "key" => cfg.hotkey.key = parse_int(line_no, value)?.max(0) as Scancode,
                _ => {}
            },
            Section::Sound => {
                if key == "enabled" {
                    cfg.sound.enabled = parse_bool(line_no, value)?;
                }
            }
            Section::None => {}
        }
    }

    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &ConfigSnapshot) -> Result<(), ConfigError> {
    if cfg.hotkey.key == 0 {
        return Err(ConfigError::InvalidValue {
            field: "hotkey.key".to_string(),
            value: "0".to_string(),
        });
    }
    if cfg.hotkey.modifier == 0 {
        return Err(ConfigError::InvalidValue {
            field: "hotkey.modifier".to_string(),
            value: "0".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_defaults() {
        let cfg = load(None).unwrap();
        assert_eq!(cfg, ConfigSnapshot::default());
    }

    #[test]
    fn parses_all_sections() {
        let text = "\
auto_switch:
  enabled: true
  min_word_len: 4
  min_score: 1.5
  threshold: 1.2
delays:
  key_press: 20
  layout_switch: 70
  retype: 12
  turbo_key_press: 3
  turbo_retype: 2
hotkey:
  modifier: 29
  key: 119
sound:
  enabled: false
";
        let cfg = parse(text).unwrap();
        assert!(cfg.auto_switch.enabled);
        assert_eq!(cfg.auto_switch.min_word_len, 4);
        assert_eq!(cfg.delays.key_press, Duration::from_millis(20));
        assert_eq!(cfg.hotkey.key, 119);
        assert!(!cfg.sound.enabled);
    }

    #[test]
    fn zero_delay_is_rejected() {
        let text = "delays:\n  key_press: 0\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn zero_hotkey_is_rejected() {
        let text = "hotkey:\n  key: 0\n  modifier: 29\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let text = "auto_switch:\n  enabled: true\n  future_field: 42\n";
        assert!(parse(text).unwrap().auto_switch.enabled);
    }
}
