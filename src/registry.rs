use crate::command::{Command, CommandKind};
use heapless::Vec;
use thiserror::Error;
use tracing::trace;

pub const MAX_SUBSCRIBERS: usize = 50;

pub type Callback = Box<dyn FnMut(&Command)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("subscriber list full")]
    SubscriberLimit,
}

/// Ordered mapping from command kind to subscriber callbacks, plus one
/// catch-all default slot.
///
/// Dispatch is synchronous and run-to-completion; callbacks must not block.
/// Not internally synchronized — callers driving this from more than one
/// thread need external mutual exclusion.
pub struct CallbackRegistry {
    subscribers: Vec<(CommandKind, Callback), MAX_SUBSCRIBERS>,
    default_subscriber: Option<Callback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            default_subscriber: None,
        }
    }

    /// Append a subscriber for `kind`. Fails once the fixed capacity is
    /// reached instead of dropping silently.
    pub fn register<F>(&mut self, kind: CommandKind, callback: F) -> Result<(), RegistryError>
    where
        F: FnMut(&Command) + 'static,
    {
        self.subscribers
            .push((kind, Box::new(callback)))
            .map_err(|_| RegistryError::SubscriberLimit)
    }

    /// Install the default subscriber, replacing any previous one. It is
    /// invoked for every dispatched command, matched or not.
    pub fn register_default<F>(&mut self, callback: F)
    where
        F: FnMut(&Command) + 'static,
    {
        self.default_subscriber = Some(Box::new(callback));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn has_default(&self) -> bool {
        self.default_subscriber.is_some()
    }

    /// Invoke matched subscribers in registration order, then the default.
    pub fn dispatch(&mut self, command: &Command) {
        let kind = command.kind();
        trace!(?kind, "dispatching");

        for (subscribed, callback) in self.subscribers.iter_mut() {
            if *subscribed == kind {
                callback(command);
            }
        }
        if let Some(callback) = self.default_subscriber.as_mut() {
            callback(command);
        }
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
