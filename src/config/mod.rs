use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::cli::SettingsArgs;
use crate::generator::{GeneratorSettings, DEFAULT_TEMPERATURE};

/// Origins every non-production deployment accepts
const DEV_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener settings
    pub server: ServerConfig,

    /// Application settings
    pub app: AppConfig,

    /// Text-completion provider settings
    pub openai: OpenAiConfig,

    /// Transcript provider settings
    pub transcript: TranscriptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: AppEnv,

    pub debug: bool,

    /// Frontend URL allowed to call the API
    pub frontend_url: String,

    pub name: String,

    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Never written back out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub api_url: String,

    pub model: String,

    /// Output token ceiling per call
    pub max_tokens: u32,

    /// Run the three generation stages concurrently
    pub concurrent_generation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// The only caption language requested
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    #[default]
    Development,
    Staging,
    Production,
}

impl AppEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Staging => "staging",
            AppEnv::Production => "production",
        }
    }
}

impl std::fmt::Display for AppEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: AppEnv::Development,
            debug: true,
            frontend_url: "http://localhost:5173".to_string(),
            name: "Smart Video Learning Tool API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 2000,
            concurrent_generation: false,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file (or defaults), then apply overrides
    pub fn load(path: Option<&Path>, overrides: &SettingsArgs) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from {}", path.display());

        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Default configuration file location
    pub fn config_path() -> Option<PathBuf> {
        // Current directory first for easy local runs
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("vidlearn").join("config.yaml"))
    }

    /// Apply environment and command line settings on top of the file values
    pub fn apply_overrides(&mut self, overrides: &SettingsArgs) {
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(environment) = overrides.app_env {
            self.app.environment = environment;
        }
        if let Some(debug) = overrides.debug {
            self.app.debug = debug;
        }
        if let Some(frontend_url) = &overrides.frontend_url {
            self.app.frontend_url = frontend_url.clone();
        }
        if let Some(api_key) = &overrides.openai_api_key {
            self.openai.api_key = Some(api_key.clone());
        }
        if let Some(api_url) = &overrides.openai_api_url {
            self.openai.api_url = api_url.clone();
        }
        if let Some(model) = &overrides.openai_model {
            self.openai.model = model.clone();
        }
        if let Some(max_tokens) = overrides.openai_max_tokens {
            self.openai.max_tokens = max_tokens;
        }
        if let Some(concurrent) = overrides.concurrent_generation {
            self.openai.concurrent_generation = concurrent;
        }
        if let Some(language) = &overrides.transcript_language {
            self.transcript.language = language.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be non-zero");
        }

        if self.openai.max_tokens == 0 {
            anyhow::bail!("OpenAI max_tokens must be greater than zero");
        }

        if self.transcript.language.trim().is_empty() {
            anyhow::bail!("Transcript language must be configured");
        }

        let frontend = Url::parse(&self.app.frontend_url)
            .with_context(|| format!("Invalid FRONTEND_URL: {}", self.app.frontend_url))?;
        if !matches!(frontend.scheme(), "http" | "https") {
            anyhow::bail!("FRONTEND_URL must use HTTP or HTTPS protocol");
        }

        Ok(())
    }

    /// Non-fatal problems worth reporting at startup
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.app.environment == AppEnv::Production {
            if !self.ai_configured() {
                warnings.push("OPENAI_API_KEY not set in production environment!".to_string());
            }
            if self.app.debug {
                warnings.push("DEBUG=True in production! Set DEBUG=False for security.".to_string());
            }
        }

        warnings
    }

    /// Whether an API key for the text-completion provider is present
    pub fn ai_configured(&self) -> bool {
        self.openai
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Origins allowed to make cross-origin requests
    pub fn cors_origins(&self) -> Vec<String> {
        let frontend = origin_of(&self.app.frontend_url);

        let mut origins: Vec<String> = match self.app.environment {
            AppEnv::Production => {
                let https = Url::parse(&frontend).ok().and_then(|mut url| {
                    url.set_scheme("https").ok()?;
                    Some(url.origin().ascii_serialization())
                });
                std::iter::once(frontend).chain(https).collect()
            }
            AppEnv::Development | AppEnv::Staging => DEV_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .chain(std::iter::once(frontend))
                .collect(),
        };

        let mut seen = std::collections::HashSet::new();
        origins.retain(|origin| seen.insert(origin.clone()));
        origins
    }

    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: self.openai.max_tokens,
            concurrent: self.openai.concurrent_generation,
        }
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Listen: {}:{}", self.server.host, self.server.port);
        println!("  Environment: {}", self.app.environment);
        println!("  Debug: {}", self.app.debug);
        println!("  Frontend URL: {}", self.app.frontend_url);
        println!("  CORS Origins: {}", self.cors_origins().join(", "));
        println!("  OpenAI Endpoint: {}", self.openai.api_url);
        println!("  OpenAI Model: {}", self.openai.model);
        println!("  OpenAI Max Tokens: {}", self.openai.max_tokens);
        println!("  OpenAI API Key: {}", mask_secret(self.openai.api_key.as_deref()));
        println!("  Concurrent Generation: {}", self.openai.concurrent_generation);
        println!("  Transcript Language: {}", self.transcript.language);
    }
}

/// Reduce a URL to its origin (`scheme://host[:port]`), leaving unparsable input as-is
fn origin_of(url: &str) -> String {
    Url::parse(url)
        .map(|parsed| parsed.origin().ascii_serialization())
        .unwrap_or_else(|_| url.trim_end_matches('/').to_string())
}

fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        Some(secret) if secret.len() > 8 && secret.is_ascii() => {
            format!("{}…{}", &secret[..3], &secret[secret.len() - 4..])
        }
        Some(secret) if !secret.is_empty() => "****".to_string(),
        _ => "(not set)".to_string(),
    }
}
