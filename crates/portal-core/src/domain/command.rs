//! Confirmation-gated admin commands

use serde::Serialize;

/// Wraps an admin command together with the operator's answer to the
/// confirmation prompt. Only a confirmed command yields its payload.
#[derive(Debug, Clone)]
pub struct Confirmed<C> {
    command: C,
    confirmed: bool,
}

impl<C> Confirmed<C> {
    pub fn new(command: C, confirmed: bool) -> Self {
        Self { command, confirmed }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn into_confirmed(self) -> Option<C> {
        self.confirmed.then_some(self.command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "result", rename_all = "lowercase")]
pub enum CommandOutcome<T> {
    Applied(T),
    Cancelled,
}

impl<T> CommandOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied(_))
    }
}
