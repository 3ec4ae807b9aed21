use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::credentials::ModelCredentials;
use crate::error::{AppError, AppResult};
use crate::extraction::request::ExtractionRequest;
use crate::services::LanguageModelService;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const SERVICE: &str = "OpenAI";

pub struct OpenAiClient {
    http: Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn completions_endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn complete(
        &self,
        request: &ExtractionRequest,
        credentials: &ModelCredentials,
    ) -> AppResult<String> {
        debug!(
            model = %request.model,
            transcript_chars = request.transcript.chars().count(),
            "requesting ticket extraction"
        );

        let response = self
            .http
            .post(self.completions_endpoint())
            .bearer_auth(&credentials.api_key)
            .header(ACCEPT, "application/json")
            .json(&ChatCompletionRequest::from_extraction(request))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_failure)?;

        if !status.is_success() {
            return Err(AppError::RemoteRejection {
                service: SERVICE,
                status: status.as_u16(),
                body: api_error_message(&body),
            });
        }

        let payload: ChatCompletionResponse = serde_json::from_str(&body).map_err(|err| {
            AppError::MalformedExtraction(format!("unexpected {SERVICE} response: {err}"))
        })?;

        if let Some(error) = payload.error {
            return Err(AppError::RemoteRejection {
                service: SERVICE,
                status: status.as_u16(),
                body: error.message,
            });
        }

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::MalformedExtraction("model response had no message content".to_string())
            })
    }
}

fn transport_failure(err: reqwest::Error) -> AppError {
    AppError::TransportFailure {
        service: SERVICE,
        message: err.to_string(),
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_extraction(request: &'a ExtractionRequest) -> Self {
        Self {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.instructions,
                },
                ChatMessage {
                    role: "user",
                    content: &request.transcript,
                },
            ],
            temperature: request.temperature,
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}
