//! Lifecycle hook table.
//!
//! Handlers are registered against an event name with a priority. Lower
//! priorities run first; handlers sharing a priority run in the order they were
//! registered. Text filters thread a string through every handler, request
//! actions run until one of them halts the request.

use crate::gate::{
    recovery::{GateOutcome, RecoveryGate, Redirect, ACTION_PARAM, LOGIN_INIT},
    resolver::ContentStore,
    text::{self, GETTEXT, SUPPRESSOR_PRIORITY},
};
use std::{collections::HashMap, fmt, future::Future, pin::Pin, sync::Arc};
use url::form_urlencoded;

pub const DEFAULT_PRIORITY: i32 = 10;

/// `(translation, source_text, domain) -> translation`
pub type TextFilter = Arc<dyn Fn(&str, &str, &str) -> String + Send + Sync>;

pub type ActionFuture = Pin<Box<dyn Future<Output = Flow> + Send>>;

pub type RequestAction = Arc<dyn Fn(&LoginRequest) -> ActionFuture + Send + Sync>;

/// What a request action decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt(Redirect),
}

impl From<GateOutcome> for Flow {
    fn from(outcome: GateOutcome) -> Self {
        match outcome {
            GateOutcome::NoOp => Self::Continue,
            GateOutcome::Redirect(redirect) => Self::Halt(redirect),
        }
    }
}

/// Request values handed to `login_init` actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginRequest {
    action: Option<String>,
}

impl LoginRequest {
    #[must_use]
    pub fn new(action: Option<String>) -> Self {
        Self { action }
    }

    /// Build from a raw query string. When `action` is repeated the last value
    /// wins.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let action = query.and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .filter(|(key, _)| key == ACTION_PARAM)
                .map(|(_, value)| value.into_owned())
                .last()
        });

        Self { action }
    }

    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

struct Registered<H> {
    priority: i32,
    handler: H,
}

fn insert_ordered<H>(list: &mut Vec<Registered<H>>, priority: i32, handler: H) {
    let at = list.partition_point(|registered| registered.priority <= priority);
    list.insert(at, Registered { priority, handler });
}

#[derive(Default)]
pub struct Hooks {
    filters: HashMap<String, Vec<Registered<TextFilter>>>,
    actions: HashMap<String, Vec<Registered<RequestAction>>>,
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook table with the lost password suppressor on `gettext` and the
    /// recovery gate on `login_init`.
    #[must_use]
    pub fn with_defaults<S>(gate: Arc<RecoveryGate<S>>) -> Self
    where
        S: ContentStore + 'static,
    {
        let mut hooks = Self::new();

        hooks.add_text_filter(GETTEXT, SUPPRESSOR_PRIORITY, text::suppress);

        hooks.add_action(LOGIN_INIT, DEFAULT_PRIORITY, move |request: &LoginRequest| {
            let gate = Arc::clone(&gate);
            let action = request.action().map(str::to_string);

            Box::pin(async move { Flow::from(gate.handle_request(action.as_deref()).await) })
                as ActionFuture
        });

        hooks
    }

    pub fn add_text_filter<F>(&mut self, event: &str, priority: i32, filter: F)
    where
        F: Fn(&str, &str, &str) -> String + Send + Sync + 'static,
    {
        let list = self.filters.entry(event.to_string()).or_default();
        insert_ordered(list, priority, Arc::new(filter));
    }

    pub fn add_action<F>(&mut self, event: &str, priority: i32, action: F)
    where
        F: Fn(&LoginRequest) -> ActionFuture + Send + Sync + 'static,
    {
        let list = self.actions.entry(event.to_string()).or_default();
        insert_ordered(list, priority, Arc::new(action));
    }

    #[must_use]
    pub fn apply_text_filters(
        &self,
        event: &str,
        translation: &str,
        text: &str,
        domain: &str,
    ) -> String {
        let mut translation = translation.to_string();

        if let Some(filters) = self.filters.get(event) {
            for registered in filters {
                translation = (registered.handler)(&translation, text, domain);
            }
        }

        translation
    }

    /// Run the actions for `event`, stopping at the first that halts.
    pub async fn run_actions(&self, event: &str, request: &LoginRequest) -> Flow {
        let Some(actions) = self.actions.get(event) else {
            return Flow::Continue;
        };

        for registered in actions {
            if let Flow::Halt(redirect) = (registered.handler)(request).await {
                return Flow::Halt(redirect);
            }
        }

        Flow::Continue
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters: HashMap<&str, usize> = self
            .filters
            .iter()
            .map(|(event, list)| (event.as_str(), list.len()))
            .collect();
        let actions: HashMap<&str, usize> = self
            .actions
            .iter()
            .map(|(event, list)| (event.as_str(), list.len()))
            .collect();

        f.debug_struct("Hooks")
            .field("filters", &filters)
            .field("actions", &actions)
            .finish()
    }
}
