//! Configuration for the agent.
//!
//! Settings come from a YAML file (default `config/config.yaml`) and are then
//! overridden by command-line arguments parsed with `arrrg`.  Every field has a
//! default, so a partial file (or no file at all) is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use arrrg_derive::CommandLine;
use serde::{Deserialize, Serialize};

use crate::backend::{ChatBackend, MockBackend};
use crate::client::OpenAiCompatible;
use crate::error::{Error, Result};
use crate::logging;

/// Config file consulted when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Provider name that selects the offline mock backend.
pub const MOCK_PROVIDER: &str = "mock";

/// Command-line arguments for the personal-agent tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct AgentArgs {
    /// Path to the YAML configuration file.
    #[arrrg(optional, "Configuration file (default: config/config.yaml)", "PATH")]
    pub config: Option<String>,

    /// Use the offline mock backend.
    #[arrrg(flag, "Answer with the offline mock backend")]
    pub mock: bool,

    /// Model to use for chat.
    #[arrrg(optional, "Model to use (overrides llm.model)", "MODEL")]
    pub model: Option<String>,

    /// Log level.
    #[arrrg(optional, "Log level: error, warn, info, debug or trace", "LEVEL")]
    pub log_level: Option<String>,

    /// Append logs to this file instead of stderr.
    #[arrrg(optional, "Write logs to this file", "PATH")]
    pub log_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Language-model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend family; `mock` selects the offline backend.
    pub provider: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// API key; falls back to the `PERSONAL_AGENT_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Endpoint prefix, e.g. `https://api.deepseek.com/v1`.
    pub api_base: Option<String>,
    /// Sampling temperature in `0.0..=1.0`.
    pub temperature: f32,
    /// Reply token limit.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Retries after a retryable failure.
    pub retry_attempts: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "deepseek-chat".to_string(),
            api_key: None,
            api_base: None,
            temperature: 0.7,
            max_tokens: 1000,
            timeout: 30,
            retry_attempts: 3,
        }
    }
}

/// Application identity and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: String,
    /// Level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Append logs here instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            log_level: logging::DEFAULT_LEVEL.to_string(),
            log_file: None,
        }
    }
}

/// Terminal presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Input prompt.
    pub prompt: String,
    /// First line of the welcome banner.
    pub welcome_message: String,
    /// Whether to use ANSI colors and styles.
    pub color: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            prompt: crate::chat::DEFAULT_PROMPT.to_string(),
            welcome_message: crate::chat::DEFAULT_WELCOME.to_string(),
            color: true,
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub llm: LlmConfig,
    pub app: AppConfig,
    pub cli: CliConfig,
}

impl AgentConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)
                .map_err(|e| Error::config(format!("invalid configuration: {e}"), None))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(
                format!("cannot read config file {}: {e}", path.display()),
                None,
            )
        })?;
        Self::from_yaml(&text)
    }

    /// Resolve configuration from the command line.
    ///
    /// An explicitly named file must exist.  The default path is optional and
    /// silently replaced by defaults when absent.
    pub fn load(args: &AgentArgs) -> Result<Self> {
        let mut config = match args.config.as_deref() {
            Some(path) => Self::from_file(Path::new(path))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    tracing::debug!(path = DEFAULT_CONFIG_PATH, "no config file; using defaults");
                    Self::default()
                }
            }
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Let command-line arguments override file settings.
    pub fn apply_args(&mut self, args: &AgentArgs) {
        if args.mock {
            self.llm.provider = MOCK_PROVIDER.to_string();
        }
        if let Some(model) = &args.model {
            self.llm.model = model.clone();
        }
        if let Some(level) = &args.log_level {
            self.app.log_level = level.clone();
        }
        if let Some(file) = &args.log_file {
            self.app.log_file = Some(PathBuf::from(file));
        }
        if args.no_color {
            self.cli.color = false;
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let llm = &self.llm;
        if llm.provider.trim().is_empty() {
            return Err(Error::config("provider must not be empty", Some("llm.provider".into())));
        }
        if llm.model.trim().is_empty() {
            return Err(Error::config("model must not be empty", Some("llm.model".into())));
        }
        if !(0.0..=1.0).contains(&llm.temperature) {
            return Err(Error::config(
                format!("temperature {} is outside 0.0..=1.0", llm.temperature),
                Some("llm.temperature".into()),
            ));
        }
        if llm.max_tokens == 0 {
            return Err(Error::config("max_tokens must be positive", Some("llm.max_tokens".into())));
        }
        if llm.timeout == 0 {
            return Err(Error::config("timeout must be positive", Some("llm.timeout".into())));
        }
        if let Some(base) = &llm.api_base {
            url::Url::parse(base).map_err(|e| {
                Error::config(
                    format!("api_base {base:?} is not an absolute URL: {e}"),
                    Some("llm.api_base".into()),
                )
            })?;
        }
        logging::parse_level(&self.app.log_level)?;
        Ok(())
    }

    /// True when the offline mock backend is selected.
    pub fn uses_mock(&self) -> bool {
        self.llm.provider.eq_ignore_ascii_case(MOCK_PROVIDER)
    }

    /// Construct the chat backend these settings describe.
    pub fn build_backend(&self) -> Result<Box<dyn ChatBackend>> {
        if self.uses_mock() {
            return Ok(Box::new(MockBackend::new()));
        }
        let llm = &self.llm;
        let client = OpenAiCompatible::with_options(
            llm.api_key.clone(),
            llm.model.clone(),
            llm.api_base.clone(),
            Some(Duration::from_secs(llm.timeout)),
        )?
        .with_temperature(Some(llm.temperature))
        .with_max_tokens(Some(llm.max_tokens))
        .with_max_retries(llm.retry_attempts);
        Ok(Box::new(client))
    }
}
