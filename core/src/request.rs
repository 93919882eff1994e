//! Request state machine for one asynchronous fetch.
//!
//! [`RequestState`] is what a screen renders. [`RequestReducer`] is the only
//! way it changes: the runtime's lifecycle manager feeds it
//! [`RequestAction`]s after checking that the fetch they belong to is still
//! current.

use crate::error::ErrorInfo;
use crate::reducer::Reducer;

/// Externally visible state of one fetch.
///
/// Exactly one of loading / data / error is authoritative at a time:
///
/// | variant     | `is_loading()` | `data()`  | `error()` |
/// |-------------|----------------|-----------|-----------|
/// | `Idle`      | `false`        | `None`    | `None`    |
/// | `Loading`   | `true`         | `None`    | `None`    |
/// | `Loaded(t)` | `false`        | `Some(t)` | `None`    |
/// | `Failed(e)` | `false`        | `None`    | `Some(e)` |
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState<T> {
    /// No fetch has been started
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The latest fetch succeeded
    Loaded(T),
    /// The latest fetch failed
    Failed(ErrorInfo),
}

impl<T> RequestState<T> {
    /// The fetched data, if the latest fetch succeeded
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Whether a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The failure, if the latest fetch failed
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the latest fetch has finished, successfully or not
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed(_))
    }

    /// Map the loaded data, keeping every other state as is
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RequestState<U> {
        match self {
            Self::Idle => RequestState::Idle,
            Self::Loading => RequestState::Loading,
            Self::Loaded(data) => RequestState::Loaded(f(data)),
            Self::Failed(error) => RequestState::Failed(error),
        }
    }
}

/// Transitions of a [`RequestState`].
#[derive(Debug, Clone, PartialEq)]
pub enum RequestAction<T> {
    /// A fetch was started
    Started,
    /// The current fetch produced data
    Succeeded(T),
    /// The current fetch failed
    Failed(ErrorInfo),
}

/// Reducer for [`RequestState`].
///
/// `Succeeded` and `Failed` only apply to a `Loading` state: a settled
/// request never flips to the other outcome, and an idle one never jumps to
/// an outcome without being started. Cancellation is not an action:
/// a cancelled fetch simply never reports.
#[derive(Debug, Clone, Copy)]
pub struct RequestReducer<T> {
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> RequestReducer<T> {
    /// Create a new request reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> Default for RequestReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Reducer for RequestReducer<T> {
    type State = RequestState<T>;
    type Action = RequestAction<T>;
    type Environment = ();

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
        match action {
            RequestAction::Started => {
                *state = RequestState::Loading;
            },
            RequestAction::Succeeded(data) => {
                if state.is_loading() {
                    *state = RequestState::Loaded(data);
                }
            },
            RequestAction::Failed(error) => {
                if state.is_loading() {
                    *state = RequestState::Failed(error);
                }
            },
        }
    }
}
