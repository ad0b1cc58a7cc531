//! Assistant turns.
//!
//! [`ActionPipeline`] is the text-in, outcome-out core: extract, run,
//! sanitize. [`AssistantSession`] wraps it with actor resolution, context
//! building, the model call and bounded chat history.

use peoplehub_abstraction::{ChatMessage, Model, ModelParameters};
use peoplehub_core::{Actor, AssistantConfig, DataStore};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::action::ExecutedAction;
use crate::context::{ContextBuilder, system_prompt};
use crate::error::Result;
use crate::extractor::ActionExtractor;
use crate::runner::ActionRunner;
use crate::sanitizer;

/// What the user sees after one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Correlates log lines and UI events for this turn.
    pub turn_id: String,
    /// Assistant prose with control payload removed.
    pub message: String,
    /// Every attempted action, in declaration order.
    pub actions: Vec<ExecutedAction>,
}

impl TurnOutcome {
    /// Whether every attempted action succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.actions.iter().all(|a| a.result.success)
    }

    /// Actions that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ExecutedAction> {
        self.actions.iter().filter(|a| !a.result.success)
    }

    /// One badge line per action, e.g. `✓ approve_leave: Leave request ... approved`.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for action in &self.actions {
            let badge = if action.result.success { '✓' } else { '✗' };
            let _ = writeln!(out, "{} {}: {}", badge, action.result.kind, action.result.message);
        }
        out.trim_end().to_string()
    }
}

/// Extract, run, sanitize.
#[derive(Clone)]
pub struct ActionPipeline {
    extractor: Arc<ActionExtractor>,
    runner: ActionRunner,
}

impl ActionPipeline {
    /// Creates a pipeline with the built-in detector chain.
    pub fn new(runner: ActionRunner) -> Self {
        Self { extractor: Arc::new(ActionExtractor::new()), runner }
    }

    /// Replaces the extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: ActionExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Processes raw assistant text for `actor`.
    ///
    /// The displayed message is cleaned from the same raw text the actions
    /// were extracted from.
    pub async fn apply(&self, actor: &Actor, raw: &str) -> TurnOutcome {
        let turn_id = Uuid::new_v4().to_string();
        let requests = self.extractor.extract(raw);
        debug!(turn_id = %turn_id, count = requests.len(), "Running extracted actions");

        let actions = self.runner.run(actor, requests).await;
        TurnOutcome { turn_id, message: sanitizer::clean(raw), actions }
    }
}

/// A chat session for one dashboard user.
pub struct AssistantSession {
    model: Arc<dyn Model>,
    store: Arc<dyn DataStore>,
    context: ContextBuilder,
    pipeline: ActionPipeline,
    history: Vec<ChatMessage>,
    history_limit: usize,
    parameters: ModelParameters,
}

impl AssistantSession {
    /// Creates a session.
    pub fn new(model: Arc<dyn Model>, store: Arc<dyn DataStore>, pipeline: ActionPipeline) -> Self {
        Self {
            model,
            context: ContextBuilder::new(Arc::clone(&store)),
            store,
            pipeline,
            history: Vec::new(),
            history_limit: 20,
            parameters: ModelParameters::default(),
        }
    }

    /// Applies history length and temperature from configuration.
    #[must_use]
    pub fn with_config(mut self, config: &AssistantConfig) -> Self {
        self.history_limit = config.history_limit;
        self.parameters.temperature = Some(config.temperature);
        self
    }

    /// Chat history, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Clears the chat history.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Runs one turn for the profile `actor_id`.
    ///
    /// The actor and role come from the store, never from the conversation.
    pub async fn process_turn(&mut self, actor_id: &str, user_text: &str) -> Result<TurnOutcome> {
        let actor = self.store.get_actor(actor_id).await?;
        let context = self.context.build(&actor).await?;

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(system_prompt(&context)));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(user_text));

        let response = self.model.generate_chat_completion(&messages, Some(self.parameters.clone())).await?;
        let outcome = self.pipeline.apply(&actor, &response.content).await;

        self.history.push(ChatMessage::user(user_text));
        self.history.push(ChatMessage::assistant(response.content));
        if self.history.len() > self.history_limit {
            let excess = self.history.len() - self.history_limit;
            self.history.drain(..excess);
        }

        info!(
            actor_id = %actor.id,
            turn_id = %outcome.turn_id,
            actions = outcome.actions.len(),
            "Assistant turn complete"
        );
        Ok(outcome)
    }
}
