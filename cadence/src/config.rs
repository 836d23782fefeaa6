use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use cadence_core::RepeatMode;

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub youtube: Youtube,
}
impl Config {
    pub const FILENAME: &str = "config.toml";

    pub fn load() -> anyhow::Result<Self> {
        match std::fs::read_to_string(Self::FILENAME) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // No config exists, create default
                tracing::info!("no config file found, creating default config");
                Ok(Config::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", Self::FILENAME)),
        }
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).with_context(|| format!("Failed to parse {}", Self::FILENAME))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let contents = toml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(Self::FILENAME, contents)
            .with_context(|| format!("Failed to write {}", Self::FILENAME))?;
        tracing::info!("saved config to {}", Self::FILENAME);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub volume: f32,
    pub repeat_mode: RepeatMode,
    pub search_limit: u32,
}
impl Default for General {
    fn default() -> Self {
        Self {
            volume: cadence_core::PlaybackSession::DEFAULT_VOLUME,
            repeat_mode: RepeatMode::Off,
            search_limit: cadence_core::Catalog::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Youtube {
    /// YouTube Data API key. `YOUTUBE_API_KEY` takes precedence when set.
    pub api_key: String,
    pub region_code: String,
    /// A Piped-compatible API instance used to resolve audio streams.
    pub stream_base_url: String,
}
impl Youtube {
    pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

    pub fn api_key(&self) -> String {
        pick_api_key(&self.api_key, std::env::var(Self::API_KEY_ENV).ok())
    }
}
impl Default for Youtube {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region_code: "US".to_string(),
            stream_base_url: "https://pipedapi.kavin.rocks".to_string(),
        }
    }
}

fn pick_api_key(configured: &str, from_env: Option<String>) -> String {
    from_env
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| configured.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = Config::parse(
            r#"
            [youtube]
            api_key = "abc"

            [general]
            repeat_mode = "All"
            "#,
        )
        .unwrap();

        assert_eq!(config.youtube.api_key, "abc");
        assert_eq!(config.youtube.region_code, "US");
        assert_eq!(config.general.repeat_mode, RepeatMode::All);
        assert_eq!(config.general.volume, 0.7);
        assert_eq!(config.general.search_limit, 20);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(Config::parse("[general]\nvolume = \"loud\"").is_err());
    }

    #[test]
    fn environment_key_wins() {
        assert_eq!(pick_api_key("from-file", Some("from-env".into())), "from-env");
        assert_eq!(pick_api_key("from-file", Some("  ".into())), "from-file");
        assert_eq!(pick_api_key("from-file", None), "from-file");
    }
}
