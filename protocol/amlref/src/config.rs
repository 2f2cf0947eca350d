// Tool configuration: defaults, optional amlref.toml, then environment overrides

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use amlref_kinetics::{Wt1Calculator, ZeroReadingPolicy, DEFAULT_ZERO_FLOOR_PERCENT};
use amlref_risk::RiskClassifier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_CONFIG_PATH: &str = "AMLREF_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "amlref.toml";

const ENV_WT1_ZERO_POLICY: &str = "AMLREF_WT1_ZERO_POLICY";
const ENV_WT1_FLOOR: &str = "AMLREF_WT1_FLOOR";
const ENV_OUTPUT: &str = "AMLREF_OUTPUT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected 'text' or 'json')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Wt1Config {
    /// Handling of a current WT1 reading of zero or below.
    pub zero_policy: ZeroReadingPolicy,
    /// Percentage substituted for such a reading under the `floor` policy.
    pub floor_percent: f64,
}

impl Default for Wt1Config {
    fn default() -> Self {
        Self {
            zero_policy: ZeroReadingPolicy::Floor,
            floor_percent: DEFAULT_ZERO_FLOOR_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub wt1: Wt1Config,
    pub output: OutputConfig,
}

impl Config {
    /// Load the effective configuration.
    ///
    /// The file is `explicit` if given, else `$AMLREF_CONFIG`, else
    /// `./amlref.toml` when it exists. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with an injectable environment lookup.
    pub fn load_with<F>(explicit: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => env(ENV_CONFIG_PATH).map(PathBuf::from).or_else(|| {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                p.exists().then_some(p)
            }),
        };

        let mut config = match path {
            Some(p) => {
                log::info!("loading configuration from '{}'", p.display());
                Self::from_file(&p)?
            }
            None => {
                log::debug!("no configuration file; using defaults");
                Self::default()
            }
        };
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str::<Config>(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `AMLREF_WT1_ZERO_POLICY`, `AMLREF_WT1_FLOOR` and `AMLREF_OUTPUT`.
    pub fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env(ENV_WT1_ZERO_POLICY) {
            self.wt1.zero_policy = v.parse().map_err(|message| ConfigError::InvalidValue {
                key: ENV_WT1_ZERO_POLICY,
                message,
            })?;
        }
        if let Some(v) = env(ENV_WT1_FLOOR) {
            self.wt1.floor_percent =
                v.trim()
                    .parse::<f64>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: ENV_WT1_FLOOR,
                        message: format!("'{v}': {e}"),
                    })?;
        }
        if let Some(v) = env(ENV_OUTPUT) {
            self.output.format = v.parse().map_err(|message| ConfigError::InvalidValue {
                key: ENV_OUTPUT,
                message,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let floor = self.wt1.floor_percent;
        if !floor.is_finite() || floor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "wt1.floor_percent",
                message: format!("{floor} must be a finite number greater than 0"),
            });
        }
        Ok(())
    }

    pub fn wt1_calculator(&self) -> Wt1Calculator {
        Wt1Calculator::new(self.wt1.zero_policy, self.wt1.floor_percent)
    }

    pub fn classifier(&self) -> RiskClassifier {
        RiskClassifier::new(self.wt1_calculator())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Commented starting point written by `amlref config init`.
pub fn default_config_text() -> String {
    let mut out = String::new();
    out.push_str("# amlref configuration\n\n");
    out.push_str("[wt1]\n");
    out.push_str("# How a current WT1 reading of 0 (undetectable) is handled:\n");
    out.push_str("#   \"floor\"  - substitute floor_percent and compute the reduction\n");
    out.push_str("#   \"reject\" - treat the reduction as undetermined\n");
    out.push_str("zero_policy = \"floor\"\n");
    out.push_str(&format!("floor_percent = {DEFAULT_ZERO_FLOOR_PERCENT:e}\n"));
    out.push_str("\n[output]\n");
    out.push_str("# \"text\" or \"json\"\n");
    out.push_str("format = \"text\"\n");
    out
}
