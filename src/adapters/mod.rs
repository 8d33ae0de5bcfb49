// Adapters layer: concrete implementations of the domain ports for external providers.

pub mod elevenlabs;
pub mod fallback;
pub mod google;

use crate::utils::error::AppError;

/// 將 reqwest 錯誤轉成應用錯誤；逾時視同供應商不可用
pub(crate) fn provider_error(provider: &str, error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::ProviderUnavailable {
            provider: provider.to_string(),
        }
    } else {
        // 不帶 URL，避免 API key 出現在錯誤訊息與日誌中
        AppError::upstream(provider, error.without_url().to_string())
    }
}
