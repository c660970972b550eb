mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ClassificationSettings, ENV_PREFIX, EmbeddingsSettings, LlmSettings, LoggingSettings,
    ModelFamilySetting, Settings, StorageProviderSetting, StorageSettings, WindowingSettings,
};
