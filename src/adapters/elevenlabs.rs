use crate::adapters::provider_error;
use crate::domain::ports::{AudioStream, Narrator};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::Client;
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
/// "Rachel"
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";
pub const API_KEY_SETTING: &str = "ELEVENLABS_API_KEY";

const PROVIDER: &str = "ElevenLabs";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct ElevenLabsNarrator {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    voice_id: String,
    model_id: String,
}

impl ElevenLabsNarrator {
    pub fn new(client: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
        }
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self.model_id = model_id.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Narrator for ElevenLabsNarrator {
    async fn narrate(&self, text: &str) -> Result<AudioStream> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::unconfigured("Narration", API_KEY_SETTING))?;

        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        tracing::debug!("Requesting narration ({} chars) from {}", text.chars().count(), url);

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
            })
            .send()
            .await
            .map_err(|e| provider_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            tracing::error!("ElevenLabs returned {}: {}", status, snippet);
            return Err(AppError::upstream_status(PROVIDER, status.as_u16()));
        }

        Ok(response
            .bytes_stream()
            .map_err(|e| provider_error(PROVIDER, e))
            .boxed())
    }
}
