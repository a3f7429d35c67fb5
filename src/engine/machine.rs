//! State registry and event dispatch.

use crate::core::{State, StateHistory, StateTransition};
use crate::engine::hooks::{Context, Directive, EngineError, StateHooks};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Upper bound on transitions chained by entry hooks in one call.
pub const MAX_CHAINED_TRANSITIONS: usize = 16;

/// Result of dispatching one event.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchStatus<S: State> {
    /// Nothing is current yet; the event was dropped
    NoActiveState,

    /// The current state had no use for the event
    Ignored(S),

    /// The event was handled without leaving the state
    Handled(S),

    /// The event moved the machine; `to` is where it came to rest
    Transitioned { from: S, to: S },
}

impl<S: State> DispatchStatus<S> {
    /// State current after the dispatch, if any.
    pub fn state(&self) -> Option<&S> {
        match self {
            Self::NoActiveState => None,
            Self::Ignored(s) | Self::Handled(s) => Some(s),
            Self::Transitioned { to, .. } => Some(to),
        }
    }
}

/// Holds registered states and the current one, and runs their hooks.
///
/// The context is passed into each call rather than owned, so the caller
/// keeps full control of it between dispatches.
#[derive(Debug)]
pub struct StateMachine<S: State> {
    states: HashMap<String, S>,
    initial: Option<S>,
    current: Option<S>,
    history: StateHistory<S>,
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateMachine<S> {
    /// Create an empty machine with no states and nothing current.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            initial: None,
            current: None,
            history: StateHistory::new(),
        }
    }

    /// Replace the history with one bounded to `limit` entries.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = StateHistory::with_limit(limit);
        self
    }

    /// Register a state under its name.
    ///
    /// A state with the same name is overwritten and returned; the last
    /// registration wins.
    pub fn register_state(&mut self, state: S) -> Option<S> {
        self.states.insert(state.name().to_string(), state)
    }

    /// Set the state [`start`](Self::start) enters.
    pub fn set_initial(&mut self, state: S) {
        self.initial = Some(state);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Registered state names, sorted.
    pub fn state_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.states.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Get transition history (pure)
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    fn lookup(&self, name: &str) -> Result<S, EngineError> {
        self.states
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownState {
                name: name.to_string(),
            })
    }

    /// Enter the initial state.
    pub fn start<C>(&mut self, ctx: &mut C) -> Result<S, S::Error>
    where
        S: StateHooks<C>,
        C: Context,
    {
        let initial = self.initial.clone().ok_or(EngineError::NoInitialState)?;
        self.transition_to(initial.name(), ctx)
    }

    /// Leave the current state (if any) and enter the named one.
    ///
    /// The target is resolved before any hook runs, so an unknown name
    /// leaves the machine untouched. Entry hooks that return
    /// [`Directive::GoTo`] continue the chain. Returns the state the
    /// machine came to rest in.
    pub fn transition_to<C>(&mut self, name: &str, ctx: &mut C) -> Result<S, S::Error>
    where
        S: StateHooks<C>,
        C: Context,
    {
        let mut target = self.lookup(name)?;

        for _ in 0..MAX_CHAINED_TRANSITIONS {
            if let Some(current) = self.current.clone() {
                debug!(state = current.name(), "Exiting state");
                current.on_exit(ctx)?;
                self.history.record(StateTransition {
                    from: current,
                    to: target.clone(),
                    timestamp: Utc::now(),
                    trigger: ctx.event().map(str::to_string),
                });
            }

            debug!(state = target.name(), "Entering state");
            self.current = Some(target.clone());

            match target.on_entry(ctx)? {
                Directive::GoTo(next) => target = self.lookup(next.name())?,
                Directive::Stay | Directive::Ignore => return Ok(target),
            }
        }

        Err(EngineError::TransitionLoop {
            from: name.to_string(),
            limit: MAX_CHAINED_TRANSITIONS,
        }
        .into())
    }

    /// Run the current state's update hook against `ctx`.
    ///
    /// With nothing current this is a no-op reporting
    /// [`DispatchStatus::NoActiveState`].
    pub fn update<C>(&mut self, ctx: &mut C) -> Result<DispatchStatus<S>, S::Error>
    where
        S: StateHooks<C>,
        C: Context,
    {
        let Some(current) = self.current.clone() else {
            trace!(event = ?ctx.event(), "No active state, event dropped");
            return Ok(DispatchStatus::NoActiveState);
        };

        match current.update(ctx)? {
            Directive::Stay => Ok(DispatchStatus::Handled(current)),
            Directive::Ignore => {
                trace!(state = current.name(), event = ?ctx.event(), "Event ignored");
                Ok(DispatchStatus::Ignored(current))
            }
            Directive::GoTo(next) => {
                let to = self.transition_to(next.name(), ctx)?;
                Ok(DispatchStatus::Transitioned { from: current, to })
            }
        }
    }
}
