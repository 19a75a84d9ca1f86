//! Shell command definitions.
//!
//! These types define the interface between the Core and the Shell for
//! timers and page reloads. HTTP goes through `crux_http`.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Timers the core may have pending, at most one of each.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimerId {
    StatusPoll,
    RestartGrace,
    ReconnectTimeout,
}

// Operations that the Shell needs to perform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShellOperation {
    /// Resolve with `TimerElapsed` after `millis`, or `TimerCancelled` if
    /// cancelled first.
    StartTimer { id: TimerId, millis: u64 },
    CancelTimer { id: TimerId },
    ReloadPage,
}

// The output from shell operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShellOutput {
    TimerElapsed { id: TimerId },
    TimerCancelled { id: TimerId },
    Acknowledged,
}

impl Operation for ShellOperation {
    type Output = ShellOutput;
}

/// Command-based shell API
pub struct Shell<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Shell<Effect, Event>
where
    Effect: Send + From<crux_core::Request<ShellOperation>> + 'static,
    Event: Send + 'static,
{
    /// Start a one-shot timer
    pub fn start_timer(id: TimerId, millis: u64) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(ShellOperation::StartTimer { id, millis })
    }

    /// Cancel a pending timer
    pub fn cancel_timer(id: TimerId) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(ShellOperation::CancelTimer { id })
    }

    /// Full page reload, which ends the current session
    pub fn reload_page() -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(ShellOperation::ReloadPage)
    }
}

/// Request builder for shell operations
#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: ShellOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<ShellOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: ShellOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Build the request into a Command RequestBuilder
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = ShellOutput>> {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}
