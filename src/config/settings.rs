use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::domain::DistanceMetric;

pub const ENV_PREFIX: &str = "FOLIO";
const FILE_STEM: &str = "folio";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub llm: LlmSettings,
    pub embeddings: EmbeddingsSettings,
    pub windowing: WindowingSettings,
    pub classification: ClassificationSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads `folio.<env>` from the working directory, overlaid with `FOLIO_*`
    /// variables such as `FOLIO_STORAGE__BUCKET`.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env().map_err(ConfigError::Message)?;
        Self::load_from(FILE_STEM, environment)
    }

    /// `file_stem` is extended with `.<env>`; the file is optional.
    pub fn load_from(file_stem: &str, environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("{file_stem}.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    #[default]
    Local,
    S3,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub classification_prefix: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            local_path: "./data".to_string(),
            bucket: None,
            region: None,
            endpoint: None,
            classification_prefix: "rb_classification".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamilySetting {
    #[default]
    Anthropic,
    Nova,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub family: ModelFamilySetting,
    pub endpoint: String,
    pub api_key: String,
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            family: ModelFamilySetting::Anthropic,
            endpoint: "https://bedrock-runtime.us-east-1.amazonaws.com".to_string(),
            api_key: String::new(),
            model_id: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingsSettings {
    pub endpoint: String,
    pub api_key: String,
    pub model_id: String,
    pub dimension: usize,
}

impl Default for EmbeddingsSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://bedrock-runtime.us-east-1.amazonaws.com".to_string(),
            api_key: String::new(),
            model_id: "amazon.titan-embed-image-v1".to_string(),
            dimension: 256,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowingSettings {
    pub window_size: u32,
    pub overlap: u32,
    pub max_overlap: u32,
}

impl Default for WindowingSettings {
    fn default() -> Self {
        Self {
            window_size: 20,
            overlap: 2,
            max_overlap: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassificationSettings {
    pub metric: DistanceMetric,
    pub top_n: usize,
    pub unknown_threshold: f32,
    pub embed_concurrency: usize,
    pub render_concurrency: usize,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::Cosine,
            top_n: 1,
            unknown_threshold: 0.8,
            embed_concurrency: 10,
            render_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
