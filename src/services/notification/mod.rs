//! Topic-based notification channel.
//!
//! Each index owns one channel. Subscribers of a topic are invoked
//! synchronously, in subscription order, every time that topic is published.
//! Alongside the payload every subscriber receives a shared reference to the
//! publisher's context (usually the publishing index itself), so handlers can
//! query the state they are being told about.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};

/// Topic key of a channel.
pub trait Topic: Copy + Eq + Hash + fmt::Debug + Send + 'static {
    /// Wire name of the topic, e.g. `"update"`.
    fn name(&self) -> &'static str;
}

type Callback<C, P> = Arc<Mutex<dyn FnMut(&C, &P) + Send>>;

struct Subscriber<C, P> {
    id: u64,
    callback: Callback<C, P>,
}

struct Registry<T, C, P> {
    next_id: u64,
    topics: HashMap<T, Vec<Subscriber<C, P>>>,
}

impl<T: Topic, C, P> Registry<T, C, P> {
    fn is_live(&self, topic: T, id: u64) -> bool {
        self.topics
            .get(&topic)
            .map_or(false, |subs| subs.iter().any(|s| s.id == id))
    }

    fn remove(&mut self, topic: T, id: u64) -> bool {
        let Some(subs) = self.topics.get_mut(&topic) else {
            return false;
        };
        let before = subs.len();
        subs.retain(|s| s.id != id);
        let removed = subs.len() != before;
        if subs.is_empty() {
            self.topics.remove(&topic);
        }
        removed
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publish/subscribe channel keyed by topic, handing subscribers a `&C`
/// context and a `&P` payload.
pub struct NotificationChannel<T: Topic, C: 'static, P: 'static> {
    registry: Arc<Mutex<Registry<T, C, P>>>,
}

/// Handle returned by [`NotificationChannel::subscribe`].
///
/// Handles may be cloned into other subscribers so one handler can cancel
/// another. Once the channel is dropped every handle becomes inert.
pub struct SubscriptionHandle<T: Topic, C: 'static, P: 'static> {
    id: u64,
    topic: T,
    registry: Weak<Mutex<Registry<T, C, P>>>,
}

impl<T: Topic, C: 'static, P: 'static> Clone for SubscriptionHandle<T, C, P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            topic: self.topic,
            registry: Weak::clone(&self.registry),
        }
    }
}

impl<T: Topic, C: 'static, P: 'static> fmt::Debug for SubscriptionHandle<T, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish()
    }
}

impl<T: Topic, C: 'static, P: 'static> SubscriptionHandle<T, C, P> {
    pub fn topic(&self) -> T {
        self.topic
    }

    /// Remove this subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => lock(&registry).remove(self.topic, self.id),
            None => false,
        }
    }

    /// Whether the subscriber is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map_or(false, |registry| lock(&registry).is_live(self.topic, self.id))
    }
}

impl<T: Topic, C: 'static, P: 'static> NotificationChannel<T, C, P> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                topics: HashMap::new(),
            })),
        }
    }

    /// Register `callback` for `topic`.
    pub fn subscribe<F>(&self, topic: T, callback: F) -> SubscriptionHandle<T, C, P>
    where
        F: FnMut(&C, &P) + Send + 'static,
    {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        let callback: Callback<C, P> = Arc::new(Mutex::new(callback));
        registry
            .topics
            .entry(topic)
            .or_default()
            .push(Subscriber { id, callback });
        log::trace!("Subscriber {} registered for '{}'", id, topic.name());

        SubscriptionHandle {
            id,
            topic,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Remove a subscriber. Returns `false` if it was not registered here.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle<T, C, P>) -> bool {
        if !Weak::ptr_eq(&handle.registry, &Arc::downgrade(&self.registry)) {
            return false;
        }
        lock(&self.registry).remove(handle.topic, handle.id)
    }

    pub fn subscriber_count(&self, topic: T) -> usize {
        lock(&self.registry)
            .topics
            .get(&topic)
            .map_or(0, |subs| subs.len())
    }

    /// Invoke every live subscriber of `topic` with `context` and `payload`.
    ///
    /// Subscribers removed by an earlier handler in the same dispatch are
    /// skipped. A handler that removes itself finishes its current call.
    pub fn publish(&self, topic: T, context: &C, payload: &P) {
        let snapshot: Vec<(u64, Callback<C, P>)> = {
            let registry = lock(&self.registry);
            match registry.topics.get(&topic) {
                Some(subs) => subs
                    .iter()
                    .map(|s| (s.id, Arc::clone(&s.callback)))
                    .collect(),
                None => return,
            }
        };

        for (id, callback) in snapshot {
            if !lock(&self.registry).is_live(topic, id) {
                continue;
            }
            let mut guard = match callback.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    log::warn!(
                        "Skipping re-entrant dispatch of '{}' to subscriber {}",
                        topic.name(),
                        id
                    );
                    continue;
                }
            };
            (&mut *guard)(context, payload);
        }
    }
}

impl<T: Topic, C: 'static, P: 'static> Default for NotificationChannel<T, C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Topic, C: 'static, P: 'static> fmt::Debug for NotificationChannel<T, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = lock(&self.registry);
        f.debug_struct("NotificationChannel")
            .field("topics", &registry.topics.keys().collect::<Vec<_>>())
            .finish()
    }
}
