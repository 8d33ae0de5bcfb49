use crate::adapters::{elevenlabs, google};
use crate::core::selector::{SelectionStrategy, DEFAULT_RESULT_LIMIT};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub selector: SelectorConfig,
    pub google: GoogleConfig,
    pub elevenlabs: ElevenLabsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// "ranked"（目前協定）或 "single"（舊版協定）
    pub strategy: String,
    pub max_results: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            strategy: "ranked".to_string(),
            max_results: DEFAULT_RESULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: google::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevenLabsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: elevenlabs::DEFAULT_BASE_URL.to_string(),
            voice_id: elevenlabs::DEFAULT_VOICE_ID.to_string(),
            model_id: elevenlabs::DEFAULT_MODEL_ID.to_string(),
        }
    }
}

fn env_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder regex"))
}

/// 空字串或未替換的 ${VAR} 都視為未設定
fn credential(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !env_placeholder().is_match(v))
        .map(str::to_string)
}

impl AppConfig {
    /// 設定檔（可選）→ 環境變數覆蓋 → 驗證
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_MAPS_API_KEY})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(key) = lookup(google::API_KEY_SETTING).filter(|k| !k.trim().is_empty()) {
            self.google.api_key = Some(key);
        }
        if let Some(key) = lookup(elevenlabs::API_KEY_SETTING).filter(|k| !k.trim().is_empty()) {
            self.elevenlabs.api_key = Some(key);
        }
        if let Some(host) = lookup("MEALSTRETCH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MEALSTRETCH_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid MEALSTRETCH_PORT '{}'", port),
            }
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        self.server
            .host
            .parse::<IpAddr>()
            .map_err(|e| AppError::InvalidConfigValueError {
                field: "server.host".to_string(),
                value: self.server.host.clone(),
                reason: e.to_string(),
            })?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validation::validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 60)?;
        validation::validate_positive_number("selector.max_results", self.selector.max_results, 1)?;
        self.selector
            .strategy
            .parse::<SelectionStrategy>()
            .map_err(|reason| AppError::InvalidConfigValueError {
                field: "selector.strategy".to_string(),
                value: self.selector.strategy.clone(),
                reason,
            })?;
        validation::validate_url("google.base_url", &self.google.base_url)?;
        validation::validate_url("elevenlabs.base_url", &self.elevenlabs.base_url)?;
        validation::validate_non_empty_string("elevenlabs.voice_id", &self.elevenlabs.voice_id)?;
        validation::validate_non_empty_string("elevenlabs.model_id", &self.elevenlabs.model_id)?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| AppError::ConfigError {
                message: format!("invalid server host '{}'", self.server.host),
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn selection_strategy(&self) -> SelectionStrategy {
        match self.selector.strategy.parse() {
            Ok(SelectionStrategy::Ranked { .. }) | Err(_) => SelectionStrategy::Ranked {
                limit: self.selector.max_results.max(1),
            },
            Ok(single) => single,
        }
    }

    pub fn google_api_key(&self) -> Option<String> {
        credential(&self.google.api_key)
    }

    pub fn elevenlabs_api_key(&self) -> Option<String> {
        credential(&self.elevenlabs.api_key)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
