//! Gemini REST client.
//!
//! `POST {base}/v1beta/models/{model}:generateContent` with the key in the
//! `x-goog-api-key` header. Request encoding and response decoding are plain
//! functions so they can be tested without a network.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::provider::{Citation, FactProvider, GenerateRequest, GenerateResponse, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "cosmiclens/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ProviderError::Transport(format!("client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

impl FactProvider for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        let url = self.endpoint(&request.model);
        log::debug!("POST {} (grounding={})", url, request.grounding);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&encode_request(request))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        decode_response(&body)
    }
}

// ── Wire format ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: [WireContent<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

#[derive(Serialize)]
struct WireContent<'a> {
    role: &'static str,
    parts: [WirePart<'a>; 1],
}

#[derive(Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTool {
    google_search: EmptyObject,
}

#[derive(Serialize)]
struct EmptyObject {}

/// JSON body for a generation request.
pub fn encode_request(request: &GenerateRequest) -> Value {
    let wire = WireRequest {
        contents: [WireContent {
            role: "user",
            parts: [WirePart {
                text: &request.prompt,
            }],
        }],
        generation_config: request
            .response_schema
            .as_ref()
            .map(|schema| WireGenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        tools: if request.grounding {
            vec![WireTool {
                google_search: EmptyObject {},
            }]
        } else {
            Vec::new()
        },
    };
    serde_json::to_value(wire).unwrap_or(Value::Null)
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct WireResponse {
    candidates: Vec<WireCandidate>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct WireCandidate {
    content: Option<WireCandidateContent>,
    grounding_metadata: Option<WireGrounding>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireCandidateContent {
    parts: Vec<WireResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct WireGrounding {
    grounding_chunks: Vec<WireChunk>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireChunk {
    web: Option<WireWeb>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct WireWeb {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct WireErrorEnvelope {
    error: WireErrorBody,
}

#[derive(Deserialize)]
struct WireErrorBody {
    message: String,
}

/// Decode a successful `generateContent` body.
///
/// Text is the concatenation of the first candidate's text parts. Grounding
/// chunks without a `web` entry are skipped.
pub fn decode_response(body: &str) -> Result<GenerateResponse, ProviderError> {
    let wire: WireResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let Some(candidate) = wire.candidates.into_iter().next() else {
        return Ok(GenerateResponse::default());
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let citations = candidate
        .grounding_metadata
        .map(|g| {
            g.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .map(|web| Citation {
                    title: web.title,
                    uri: web.uri,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(GenerateResponse {
        text: if text.is_empty() { None } else { Some(text) },
        citations,
    })
}

/// Human-readable message from an error body, if it has the usual envelope.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<WireErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.trim().is_empty())
}
