use thiserror::Error;

/// 選餐器找不到任何符合條件的餐點
#[derive(Error, Debug, Clone, PartialEq)]
#[error("No meal fits a ${budget:.2} budget: {hint}")]
pub struct SelectionError {
    pub budget: f64,
    pub hint: String,
}

impl SelectionError {
    pub fn new(budget: f64) -> Self {
        Self {
            budget,
            hint: "Try raising your budget, or relax allergy or stove constraints.".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    InvalidInput { message: String },

    #[error(transparent)]
    NoViableMeal(#[from] SelectionError),

    #[error("{message}")]
    NotFound { message: String },

    #[error("{feature} is not configured (set {setting})")]
    Unconfigured { feature: String, setting: String },

    #[error("{provider} is unavailable right now")]
    ProviderUnavailable { provider: String },

    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: String,
        message: String,
        status: Option<u16>,
    },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    NoResult,
    Deployment,
    Upstream,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn upstream(provider: &str, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.to_string(),
            message: message.into(),
            status: None,
        }
    }

    /// 供應商回應非 2xx；狀態碼可安全回傳給呼叫端
    pub fn upstream_status(provider: &str, status: u16) -> Self {
        Self::Upstream {
            provider: provider.to_string(),
            message: format!("HTTP {}", status),
            status: Some(status),
        }
    }

    pub fn unconfigured(feature: &str, setting: &str) -> Self {
        Self::Unconfigured {
            feature: feature.to_string(),
            setting: setting.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::NotFound { .. } => ErrorCategory::Client,
            Self::NoViableMeal(_) => ErrorCategory::NoResult,
            Self::Unconfigured { .. }
            | Self::ProviderUnavailable { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Deployment,
            Self::Upstream { .. } | Self::Http(_) => ErrorCategory::Upstream,
            Self::Catalog { .. } | Self::IoError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Client | ErrorCategory::NoResult => ErrorSeverity::Low,
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Deployment => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 對應的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client | ErrorCategory::NoResult => 400,
            ErrorCategory::Upstream => 500,
            ErrorCategory::Internal => 500,
            ErrorCategory::Deployment => match self {
                Self::Unconfigured { .. } | Self::ProviderUnavailable { .. } => 503,
                _ => 500,
            },
        }
    }

    /// 回傳給呼叫端的訊息，上游錯誤不外洩內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Upstream {
                provider,
                status: Some(status),
                ..
            } => format!("{} is temporarily unavailable (upstream status {})", provider, status),
            Self::Upstream { provider, .. } => format!("{} is temporarily unavailable", provider),
            Self::Http(_) => "An upstream service could not be reached".to_string(),
            Self::Catalog { .. } | Self::IoError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidInput { .. } => "Check the request fields and try again".to_string(),
            Self::NoViableMeal(e) => e.hint.clone(),
            Self::NotFound { .. } => "Try a more specific address".to_string(),
            Self::Unconfigured { setting, .. } => {
                format!("Set {} in the environment or config file and restart", setting)
            }
            Self::ProviderUnavailable { .. } | Self::Upstream { .. } | Self::Http(_) => {
                "Check provider status and network connectivity".to_string()
            }
            Self::Catalog { .. } => "Fix the built-in catalog data".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Review the configuration file".to_string(),
            Self::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
