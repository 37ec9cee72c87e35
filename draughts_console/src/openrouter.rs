// OpenRouter chat-completions client and the move provider built on top of it.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use draughts_arena::game::GameState;
use draughts_arena::protocol::{MoveProvider, ProviderError, build_prompt, system_rules};
use draughts_arena::side::Side;
use log::{debug, trace};
use serde::{Deserialize, Serialize};


#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
}

// Cheap to clone: `reqwest::Client` shares its connection pool between clones.
#[derive(Clone, Debug)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client.")?;
        Ok(OpenRouterClient {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    fn url(&self, endpoint: &str) -> String { format!("{}/{}", self.base_url, endpoint) }

    pub async fn list_models(&self) -> anyhow::Result<Vec<ModelInfo>> {
        anyhow::ensure!(!self.api_key.is_empty(), "API key required.");
        let list = self
            .http
            .get(self.url("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Requesting model list failed.")?
            .error_for_status()
            .context("Model list request rejected.")?
            .json::<ModelList>()
            .await
            .context("Parsing model list failed.")?;
        Ok(list.data.into_iter().map(ModelInfo::from).collect())
    }

    // Sends a system + user conversation and returns the text of the first choice.
    pub async fn complete(
        &self, model: &str, system: &str, user: &str, temperature: f64,
    ) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredentials);
        }
        let request = ChatRequest {
            model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature,
        };
        let response = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus(status.as_u16()));
        }
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;
        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_owned())
            .unwrap_or_default();
        if text.is_empty() { Err(ProviderError::EmptyResponse) } else { Ok(text) }
    }
}

impl From<ModelEntry> for ModelInfo {
    fn from(entry: ModelEntry) -> Self {
        let name = entry.name.filter(|name| !name.is_empty()).unwrap_or_else(|| entry.id.clone());
        ModelInfo { id: entry.id, name }
    }
}

// Case-insensitive substring match on id or display name. An empty filter keeps everything.
pub fn filter_models<'a>(models: &'a [ModelInfo], filter: &str) -> Vec<&'a ModelInfo> {
    let filter = filter.trim().to_lowercase();
    models
        .iter()
        .filter(|m| m.id.to_lowercase().contains(&filter) || m.name.to_lowercase().contains(&filter))
        .collect()
}

pub struct OpenRouterProvider {
    client: OpenRouterClient,
    model: String,
    temperature: f64,
}

impl OpenRouterProvider {
    pub fn new(client: OpenRouterClient, model: String, temperature: f64) -> Self {
        OpenRouterProvider { client, model, temperature }
    }
}

#[async_trait]
impl MoveProvider for OpenRouterProvider {
    fn id(&self) -> &str { &self.model }

    async fn get_move(
        &self, state: &GameState, side: Side, was_warned: bool,
    ) -> Result<String, ProviderError> {
        let prompt = build_prompt(state, side, was_warned);
        trace!("Prompt for {}:\n{}", self.model, prompt);
        let answer = self.client.complete(&self.model, system_rules(), &prompt, self.temperature).await;
        debug!("{} answered: {:?}", self.model, answer);
        answer
    }
}
