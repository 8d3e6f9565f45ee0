use serde::Deserialize;

use crate::domain::{ChainSettings, DomainError, ProviderCredentials, StepKind, TemplateCatalog};
use crate::infrastructure::llm::DEFAULT_OPENAI_BASE_URL;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Deployment switches for the chain endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default)]
    pub feature_enabled: bool,
    #[serde(default = "default_true")]
    pub production_mode: bool,
}

#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub organization: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// No timeout unless set
    pub timeout_secs: Option<u64>,
}

/// Prompt template per step; each must contain `${var:prompt}` once
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    pub components: String,
    pub instances: String,
    pub layout: String,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            feature_enabled: false,
            production_mode: true,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            organization: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("organization", &self.organization)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            components: concat!(
                "You are building a web page from a library of UI components.\n",
                "Pick the components needed for this request: ${var:prompt}\n",
                "Reply with a JSON array of component names in a ```json code block."
            )
            .to_string(),
            instances: concat!(
                "Instantiate the chosen components for this request: ${var:prompt}\n",
                "Reply with a JSON array of objects with \"component\", \"props\" and ",
                "optional \"children\" in a ```json code block."
            )
            .to_string(),
            layout: concat!(
                "Arrange the instances on the page for this request: ${var:prompt}\n",
                "Reply with the layout as JSON in a ```json code block."
            )
            .to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.openai.apply_env_fallback();

        Ok(app_config)
    }

    pub fn chain_settings(&self) -> ChainSettings {
        ChainSettings {
            feature_enabled: self.chain.feature_enabled,
            production_mode: self.chain.production_mode,
        }
    }
}

impl OpenAiConfig {
    /// Fill unset credentials from `OPENAI_API_KEY` / `OPENAI_ORGANIZATION`
    pub fn apply_env_fallback(&mut self) {
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        if self.organization.is_none() {
            self.organization = std::env::var("OPENAI_ORGANIZATION").ok();
        }
    }

    pub fn credentials(&self) -> ProviderCredentials {
        ProviderCredentials::new(self.api_key.clone(), self.organization.clone())
    }
}

impl TemplatesConfig {
    /// Parse every template; a template without exactly one marker is a
    /// startup error
    pub fn catalog(&self) -> Result<TemplateCatalog, DomainError> {
        TemplateCatalog::new()
            .with_template(StepKind::Components, self.components.as_str())?
            .with_template(StepKind::Instances, self.instances.as_str())?
            .with_template(StepKind::Layout, self.layout.as_str())
    }
}
