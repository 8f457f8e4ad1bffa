//! Configuration loading from shade.toml
//!
//! Shadebench configuration can be specified in a `shade.toml` file,
//! discovered by walking up from the current directory. CLI flags
//! override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Shadebench configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShadeConfig {
    /// Corpus configuration.
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Remote backend configuration.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Sandbox worker configuration.
    #[serde(default)]
    pub sandbox: SandboxConfig,
    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Corpus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding the benchmark images.
    #[serde(default = "default_corpus_dir")]
    pub directory: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            directory: default_corpus_dir(),
        }
    }
}

/// Remote backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Filter endpoint URL (POST, multipart field "file" with a PNG).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

/// Sandbox worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Worker reply timeout (e.g. "60s", "500ms").
    #[serde(default = "default_worker_timeout")]
    pub timeout: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            timeout: default_worker_timeout(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default report format: "human", "json", "csv".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_corpus_dir() -> String {
    "corpus".to_string()
}
fn default_endpoint() -> String {
    "http://127.0.0.1:8080/filter".to_string()
}
fn default_worker_timeout() -> String {
    "60s".to_string()
}
fn default_format() -> String {
    "human".to_string()
}

impl ShadeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("shade.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Parse a duration string (e.g. "3s", "500ms", "2m").
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("empty duration string"));
        }

        // Find where the number ends and the unit begins.
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid duration number: {}", num_part))?;

        let nanos_per_unit: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * nanos_per_unit as f64) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShadeConfig::default();
        assert_eq!(config.corpus.directory, "corpus");
        assert_eq!(config.remote.endpoint, "http://127.0.0.1:8080/filter");
        assert_eq!(config.sandbox.timeout, "60s");
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(
            ShadeConfig::parse_duration("3s").unwrap(),
            Duration::from_secs(3)
        );
        assert_eq!(
            ShadeConfig::parse_duration("500ms").unwrap(),
            Duration::from_millis(500)
        );
        assert_eq!(
            ShadeConfig::parse_duration("100us").unwrap(),
            Duration::from_micros(100)
        );
        assert_eq!(
            ShadeConfig::parse_duration("2m").unwrap(),
            Duration::from_secs(120)
        );
        assert_eq!(
            ShadeConfig::parse_duration("1.5s").unwrap(),
            Duration::from_millis(1500)
        );
        assert!(ShadeConfig::parse_duration("").is_err());
        assert!(ShadeConfig::parse_duration("3fortnights").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [remote]
            endpoint = "http://filter.internal:9000/filter"

            [sandbox]
            timeout = "10s"
        "#;

        let config: ShadeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.remote.endpoint, "http://filter.internal:9000/filter");
        assert_eq!(config.sandbox.timeout, "10s");
        // Defaults should still apply
        assert_eq!(config.corpus.directory, "corpus");
        assert_eq!(config.output.format, "human");
    }
}
