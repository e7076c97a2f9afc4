//! World configuration.

/// Environment variable that enables strict attribute hydration.
pub const STRICT_ATTRIBUTES_ENV: &str = "ENGINE_STRICT_ATTRIBUTES";

/// Environment variable that toggles the despawn log.
pub const RECORD_DESPAWNS_ENV: &str = "ENGINE_RECORD_DESPAWNS";

/// Behaviour switches for a [`World`](crate::World).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    /// When rebuilding a declared component from a foreign record, fail on a
    /// missing or mistyped attribute instead of keeping its default.
    pub strict_attributes: bool,
    /// Append despawned entities to the despawn log.
    pub record_despawns: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            strict_attributes: false,
            record_despawns: true,
        }
    }
}

impl WorldConfig {
    /// Defaults overridden by [`STRICT_ATTRIBUTES_ENV`] and
    /// [`RECORD_DESPAWNS_ENV`] when they are set to a recognised flag value.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            strict_attributes: env_flag(STRICT_ATTRIBUTES_ENV)
                .unwrap_or(defaults.strict_attributes),
            record_despawns: env_flag(RECORD_DESPAWNS_ENV).unwrap_or(defaults.record_despawns),
        }
    }

    #[must_use]
    pub fn with_strict_attributes(mut self, strict: bool) -> Self {
        self.strict_attributes = strict;
        self
    }

    #[must_use]
    pub fn with_record_despawns(mut self, record: bool) -> Self {
        self.record_despawns = record;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert!(!config.strict_attributes);
        assert!(config.record_despawns);
    }

    #[test]
    fn test_builder_overrides() {
        let config = WorldConfig::default()
            .with_strict_attributes(true)
            .with_record_despawns(false);
        assert!(config.strict_attributes);
        assert!(!config.record_despawns);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
