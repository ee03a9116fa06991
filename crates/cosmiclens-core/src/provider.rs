//! Generative-AI provider seam.
//!
//! The resolver builds a [`GenerateRequest`], hands it to a [`FactProvider`]
//! along with the current API key, and interprets the [`GenerateResponse`].
//! Nothing about the wire protocol leaks past this module and its
//! implementations.

use std::future::Future;

use cosmiclens_logic::fact::Outcome;
use serde_json::Value;

/// One generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// JSON schema the answer must follow; requests JSON output when set.
    pub response_schema: Option<Value>,
    /// Allow the provider to ground the answer with web search.
    pub grounding: bool,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            response_schema: None,
            grounding: false,
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_grounding(mut self) -> Self {
        self.grounding = true;
        self
    }
}

/// A web citation attached to a grounded answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Citation {
    pub title: Option<String>,
    pub uri: Option<String>,
}

impl Citation {
    pub fn new(title: Option<&str>, uri: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            uri: uri.map(str::to_string),
        }
    }
}

/// What came back from a generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub citations: Vec<Citation>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            citations: Vec::new(),
        }
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The provider answered but with no text.
    #[error("no response from the provider")]
    EmptyResponse,
    /// The answer could not be decoded into the expected shape.
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Outcome reported when this error ends a resolution.
    pub fn outcome(&self) -> Outcome {
        match self {
            ProviderError::Transport(_) | ProviderError::Status { .. } => {
                Outcome::RemoteTransportError
            }
            ProviderError::EmptyResponse | ProviderError::Decode(_) => Outcome::RemoteParseError,
        }
    }
}

/// Something that can answer a [`GenerateRequest`].
pub trait FactProvider {
    fn generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<GenerateResponse, ProviderError>> + Send;
}
