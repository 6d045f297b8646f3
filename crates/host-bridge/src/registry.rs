//! Single-subscriber channels
//!
//! Each host event kind has exactly one consumer. Registering a second one
//! is a startup bug and fails instead of silently replacing the first.

use crate::error::{BridgeError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Event handler for a channel
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Proof of registration, needed to unregister
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the registration is the only way to unregister"]
pub struct Registration {
    channel: &'static str,
    id: u64,
}

impl Registration {
    /// Channel this registration belongs to
    pub fn channel(&self) -> &'static str {
        self.channel
    }
}

/// A channel with at most one subscriber
pub struct SingleSubscriber<T> {
    name: &'static str,
    next_id: AtomicU64,
    slot: Mutex<Option<(u64, Handler<T>)>>,
}

impl<T> SingleSubscriber<T> {
    /// Create an empty channel
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: AtomicU64::new(0),
            slot: Mutex::new(None),
        }
    }

    /// Channel name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Install the subscriber; fails if one is already installed
    pub fn register<F>(&self, handler: F) -> Result<Registration>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            tracing::error!(channel = self.name, "second subscriber rejected");
            return Err(BridgeError::AlreadyRegistered { channel: self.name });
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *slot = Some((id, Arc::new(handler)));
        tracing::debug!(channel = self.name, "subscriber registered");
        Ok(Registration {
            channel: self.name,
            id,
        })
    }

    /// Remove the subscriber; stale registrations are ignored
    pub fn unregister(&self, registration: Registration) -> bool {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some((id, _)) if *id == registration.id && registration.channel == self.name => {
                *slot = None;
                tracing::debug!(channel = self.name, "subscriber unregistered");
                true
            }
            _ => false,
        }
    }

    /// Check if a subscriber is installed
    pub fn is_registered(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Deliver `event`; returns false if nobody is listening
    pub fn dispatch(&self, event: &T) -> bool {
        // Handler runs outside the lock so it may unregister itself
        let handler = self.slot.lock().as_ref().map(|(_, h)| h.clone());
        match handler {
            Some(handler) => {
                handler(event);
                true
            }
            None => {
                tracing::warn!(channel = self.name, "no subscriber; event dropped");
                false
            }
        }
    }

    /// Drop the subscriber regardless of who registered it
    pub(crate) fn clear(&self) {
        *self.slot.lock() = None;
    }
}

impl<T> fmt::Debug for SingleSubscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleSubscriber")
            .field("name", &self.name)
            .field("registered", &self.is_registered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_dispatch() {
        let channel = SingleSubscriber::<u32>::new("numbers");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _registration = channel.register(move |n| sink.lock().push(*n)).unwrap();

        assert!(channel.dispatch(&7));
        assert_eq!(*seen.lock(), vec![7]);
    }

    #[test]
    fn test_second_registration_fails() {
        let channel = SingleSubscriber::<u32>::new("numbers");
        let _first = channel.register(|_| {}).unwrap();
        let err = channel.register(|_| {}).unwrap_err();
        assert_eq!(err, BridgeError::AlreadyRegistered { channel: "numbers" });
    }

    #[test]
    fn test_unregister_allows_new_subscriber() {
        let channel = SingleSubscriber::<u32>::new("numbers");
        let first = channel.register(|_| {}).unwrap();
        assert!(channel.unregister(first.clone()));
        assert!(!channel.is_registered());

        let _second = channel.register(|_| {}).unwrap();
        // The old registration no longer owns the slot
        assert!(!channel.unregister(first));
        assert!(channel.is_registered());
    }

    #[test]
    fn test_dispatch_without_subscriber() {
        let channel = SingleSubscriber::<u32>::new("numbers");
        assert!(!channel.dispatch(&1));
    }

    #[test]
    fn test_registration_from_other_channel_ignored() {
        let a = SingleSubscriber::<u32>::new("a");
        let b = SingleSubscriber::<u32>::new("b");
        let _reg_a = a.register(|_| {}).unwrap();
        let reg_b = b.register(|_| {}).unwrap();

        let foreign = Registration {
            channel: reg_b.channel(),
            id: 0,
        };
        assert!(!a.unregister(foreign));
        assert!(a.is_registered());
    }
}
