//! Action pipeline for the PeopleHub assistant.
//!
//! Turns free-form assistant output into authorized side effects:
//!
//! - [`extractor`] finds action declarations in the raw text
//! - [`runner`] executes them concurrently, one result per action
//! - [`executor`] authorizes each action against the trusted actor and
//!   applies it to the [`DataStore`](peoplehub_core::DataStore)
//! - [`sanitizer`] strips control payload from the text shown to the user
//!
//! [`AssistantSession`] ties these together with a [`Model`](peoplehub_abstraction::Model)
//! and role-scoped context.

pub mod action;
pub mod assistant;
pub mod context;
pub mod error;
pub mod executor;
pub mod extractor;
pub mod navigation;
pub mod notify;
pub mod runner;
pub mod sanitizer;

pub use action::{ActionKind, ActionRequest, ActionResult, ExecutedAction, FailureKind, is_record_id};
pub use assistant::{ActionPipeline, AssistantSession, TurnOutcome};
pub use context::{AssistantContext, ContextBuilder, system_prompt};
pub use error::{AgentError, Result};
pub use executor::{ActionHandler, DomainActionExecutor, ExecutorPolicy};
pub use extractor::{ActionDetector, ActionExtractor};
pub use navigation::{
    HistoryNavigator, NavigationError, NavigationResolver, Navigator, ResolvedRoute, Route,
    RouteTable,
};
pub use notify::{BroadcastNotifier, Notifier, NotifyLevel, QueryCache, QueryKey, TracingNotifier, UiEvent};
pub use runner::{ActionRunner, DEFAULT_ACTION_TIMEOUT, RunnerConfig};
