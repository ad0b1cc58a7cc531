//! Scripted model used by tests and offline CLI runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::{ChatMessage, Model, ModelError, ModelParameters, ModelResponse, ModelUsage};

/// Model that replays queued responses in order.
///
/// Every call records the messages it received so tests can inspect the
/// prompt that was sent. When the queue is empty the model answers with a
/// `ModelResponseError`.
pub struct ScriptedModel {
    id: String,
    responses: Mutex<VecDeque<Result<String, ModelError>>>,
    received: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    /// Creates a new `ScriptedModel` with the given ID and no responses.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            responses: Mutex::new(VecDeque::new()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response.
    #[must_use]
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(Ok(content.into()));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn with_error(self, error: ModelError) -> Self {
        self.push(Err(error));
        self
    }

    /// Queue a response after construction.
    pub fn push(&self, response: Result<String, ModelError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    /// Message lists received so far, one entry per call.
    pub fn received(&self) -> Vec<Vec<ChatMessage>> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

fn count_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[async_trait]
impl Model for ScriptedModel {
    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.id,
            message_count = messages.len(),
            parameters = ?parameters,
            "ScriptedModel generating chat completion"
        );

        if let Ok(mut received) = self.received.lock() {
            received.push(messages.to_vec());
        }

        let next = self
            .responses
            .lock()
            .map_err(|e| ModelError::Other(format!("response queue poisoned: {}", e)))?
            .pop_front();

        let content = match next {
            Some(result) => result?,
            None => {
                return Err(ModelError::ModelResponseError(format!(
                    "{} has no scripted response left",
                    self.id
                )));
            }
        };

        let prompt_tokens = messages.iter().map(|m| count_tokens(&m.content)).sum::<u32>();
        let completion_tokens = count_tokens(&content);

        Ok(ModelResponse {
            content,
            model_id: Some(self.id.clone()),
            usage: Some(ModelUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
        })
    }

    fn model_id(&self) -> &str {
        &self.id
    }
}
