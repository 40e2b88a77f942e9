//! Client configuration loaded from environment variables.
//!
//! Every setting has a default, so an empty environment yields a working
//! configuration.

use std::path::PathBuf;

use image::Rgba;

use missive_media::AvatarConfig;
use missive_shared::constants::{DEFAULT_CONVERSATION_LIMIT, DEFAULT_OVERFLOW_TEMPLATE};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Most messages kept in a fetched conversation.
    /// Env: `MISSIVE_CONVERSATION_LIMIT`
    /// Default: `10`
    pub conversation_size_limit: usize,

    /// Composite icon settings.
    /// Env: `MISSIVE_AVATAR_SIZE`, `MISSIVE_AVATAR_MAX_GROUP`,
    /// `MISSIVE_AVATAR_CORNER_RADIUS` (percent), `MISSIVE_AVATAR_BACKGROUND`,
    /// `MISSIVE_AVATAR_STROKE` (hex `RRGGBB` or `RRGGBBAA`),
    /// `MISSIVE_AVATAR_FILL_BACKGROUND` (true/false)
    pub avatar: AvatarConfig,

    /// Title suffix when participants overflow; `{count}` is replaced with
    /// the number of names left out.
    /// Env: `MISSIVE_OVERFLOW_TEMPLATE`
    /// Default: `" +{count} more"`
    pub overflow_template: String,

    /// Ledger database file.
    /// Env: `MISSIVE_DB_PATH`
    /// Default: `None` (platform data directory).
    pub db_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            conversation_size_limit: DEFAULT_CONVERSATION_LIMIT,
            avatar: AvatarConfig::default(),
            overflow_template: DEFAULT_OVERFLOW_TEMPLATE.to_string(),
            db_path: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = var("MISSIVE_CONVERSATION_LIMIT") {
            match val.parse::<usize>() {
                Ok(n) => config.conversation_size_limit = n,
                Err(_) => tracing::warn!(value = %val, "Invalid MISSIVE_CONVERSATION_LIMIT, using default"),
            }
        }

        // -- Avatar --

        if let Some(val) = var("MISSIVE_AVATAR_SIZE") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => config.avatar.size = n,
                _ => tracing::warn!(value = %val, "Invalid MISSIVE_AVATAR_SIZE, using default"),
            }
        }

        if let Some(val) = var("MISSIVE_AVATAR_MAX_GROUP") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.avatar.max_group_size = n,
                _ => tracing::warn!(value = %val, "Invalid MISSIVE_AVATAR_MAX_GROUP, using default"),
            }
        }

        if let Some(val) = var("MISSIVE_AVATAR_CORNER_RADIUS") {
            match val.parse::<u32>() {
                Ok(percent) => {
                    config.avatar.corner_radius = AvatarConfig::corner_radius_from_percent(percent)
                }
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid MISSIVE_AVATAR_CORNER_RADIUS, using default")
                }
            }
        }

        if let Some(val) = var("MISSIVE_AVATAR_BACKGROUND") {
            match parse_hex_color(&val) {
                Ok(color) => config.avatar.background = color,
                Err(e) => tracing::warn!(error = %e, "Invalid MISSIVE_AVATAR_BACKGROUND, using default"),
            }
        }

        if let Some(val) = var("MISSIVE_AVATAR_STROKE") {
            match parse_hex_color(&val) {
                Ok(color) => config.avatar.stroke = color,
                Err(e) => tracing::warn!(error = %e, "Invalid MISSIVE_AVATAR_STROKE, using default"),
            }
        }

        if let Some(val) = var("MISSIVE_AVATAR_FILL_BACKGROUND") {
            config.avatar.fill_background = val != "false" && val != "0";
        }

        // -- Misc --

        if let Some(template) = var("MISSIVE_OVERFLOW_TEMPLATE") {
            config.overflow_template = template;
        }

        if let Some(path) = var("MISSIVE_DB_PATH") {
            if !path.is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}

/// Parse `RRGGBB` or `RRGGBBAA`, with an optional leading `#`.
fn parse_hex_color(value: &str) -> Result<Rgba<u8>, String> {
    let digits = value.trim().trim_start_matches('#');
    let bytes = hex::decode(digits).map_err(|e| format!("{value}: {e}"))?;
    match bytes.as_slice() {
        [r, g, b] => Ok(Rgba([*r, *g, *b, 0xff])),
        [r, g, b, a] => Ok(Rgba([*r, *g, *b, *a])),
        _ => Err(format!("expected 6 or 8 hex chars, got {}", digits.len())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> ClientConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.conversation_size_limit, 10);
        assert_eq!(config.avatar.size, 128);
        assert_eq!(config.avatar.max_group_size, 4);
        assert_eq!(config.overflow_template, " +{count} more");
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("MISSIVE_CONVERSATION_LIMIT", "25"),
            ("MISSIVE_AVATAR_CORNER_RADIUS", "250"),
            ("MISSIVE_AVATAR_STROKE", "#ff000080"),
            ("MISSIVE_AVATAR_FILL_BACKGROUND", "0"),
            ("MISSIVE_DB_PATH", "/tmp/ledger.db"),
        ]);
        assert_eq!(config.conversation_size_limit, 25);
        assert_eq!(config.avatar.corner_radius, 1.0);
        assert_eq!(config.avatar.stroke, Rgba([0xff, 0, 0, 0x80]));
        assert!(!config.avatar.fill_background);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/ledger.db")));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = from_pairs(&[
            ("MISSIVE_CONVERSATION_LIMIT", "many"),
            ("MISSIVE_AVATAR_SIZE", "0"),
            ("MISSIVE_AVATAR_BACKGROUND", "zzzzzz"),
        ]);
        assert_eq!(config.conversation_size_limit, 10);
        assert_eq!(config.avatar.size, 128);
        assert_eq!(config.avatar.background, Rgba([0x9e, 0x9e, 0x9e, 0xff]));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("9e9e9e").unwrap(), Rgba([0x9e, 0x9e, 0x9e, 0xff]));
        assert_eq!(parse_hex_color("00000000").unwrap(), Rgba([0, 0, 0, 0]));
        assert!(parse_hex_color("abcd").is_err());
    }
}
