//! Event Bus implementation.
//!
//! Provides the generic EventBus struct used to fan out already-produced
//! events to synchronous handlers and async receivers.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use uuid::Uuid;

/// An event that can travel over an [`EventBus`].
pub trait BusEvent: Clone + Debug + Send + Sync + 'static {
    /// Coarse grouping used by [`EventFilter::Categories`].
    type Category: Copy + PartialEq + Debug + Send + Sync + 'static;

    /// Category of this event.
    fn category(&self) -> Self::Category;

    /// One-line human readable summary, used for logging.
    fn description(&self) -> String;
}

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event categories
#[derive(Debug, Clone)]
pub enum EventFilter<C> {
    /// Receive all events.
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<C>),
}

impl<C> Default for EventFilter<C> {
    fn default() -> Self {
        EventFilter::All
    }
}

impl<C: PartialEq> EventFilter<C> {
    /// Check if an event matches this filter
    pub fn matches<E>(&self, event: &E) -> bool
    where
        E: BusEvent<Category = C>,
    {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler<E> = Box<dyn Fn(E) + Send + Sync>;
type HandlerMap<E> =
    HashMap<SubscriptionId, (EventFilter<<E as BusEvent>::Category>, EventHandler<E>)>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Channel capacity for broadcast.
    pub channel_capacity: usize,
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
    /// How long to retain events in history.
    pub history_retention: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            enable_history: false,
            max_history_size: 1000,
            history_retention: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone)]
struct TimestampedEvent<E> {
    event: E,
    timestamp: Instant,
}

/// Error types for event bus operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// No subscribers are listening
    #[error("No active subscribers")]
    NoSubscribers,
    /// Channel is closed
    #[error("Event channel is closed")]
    ChannelClosed,
    /// Receiver fell behind
    #[error("Event channel is full, {0} events dropped")]
    ChannelFull(u64),
}

/// Event bus distributing one event type to many subscribers
pub struct EventBus<E: BusEvent> {
    sender: broadcast::Sender<E>,
    handlers: Arc<RwLock<HandlerMap<E>>>,
    history: Arc<RwLock<VecDeque<TimestampedEvent<E>>>>,
    config: EventBusConfig,
}

impl<E: BusEvent> EventBus<E> {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(VecDeque::new())),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Handlers run on the calling thread before the event is broadcast.
    /// Returns the number of async receivers reached, or
    /// [`EventBusError::NoSubscribers`] if nobody at all was listening.
    pub fn publish(&self, event: E) -> Result<usize, EventBusError> {
        if self.config.enable_history {
            self.add_to_history(&event);
        }

        tracing::trace!("Publishing {}", event.description());

        let handlers = self.handlers.read();
        for (filter, handler) in handlers.values() {
            if filter.matches(&event) {
                handler(event.clone());
            }
        }

        match self.sender.send(event) {
            Ok(count) => Ok(count),
            Err(_) if handlers.is_empty() => Err(EventBusError::NoSubscribers),
            Err(_) => Ok(0),
        }
    }

    /// Publish every event from an iterator, in order
    ///
    /// Returns how many events reached at least one subscriber.
    pub fn publish_all<I>(&self, events: I) -> usize
    where
        I: IntoIterator<Item = E>,
    {
        events
            .into_iter()
            .map(|event| self.publish(event))
            .filter(Result::is_ok)
            .count()
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler is called on the publishing thread and should return
    /// quickly.
    pub fn subscribe<F>(&self, filter: EventFilter<E::Category>, handler: F) -> SubscriptionId
    where
        F: Fn(E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for polling events from an async task
    pub fn receiver(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    /// Unsubscribe a handler
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Number of synchronous handlers
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Recent event history, if enabled
    ///
    /// Returns events since the given instant, or all retained history if None.
    pub fn history(&self, since: Option<Instant>) -> Vec<E> {
        if !self.config.enable_history {
            return Vec::new();
        }

        let history = self.history.read();
        history
            .iter()
            .filter(|e| since.map_or(true, |since| e.timestamp >= since))
            .map(|e| e.event.clone())
            .collect()
    }

    /// Clear event history
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn add_to_history(&self, event: &E) {
        let mut history = self.history.write();
        let now = Instant::now();

        history.push_back(TimestampedEvent {
            event: event.clone(),
            timestamp: now,
        });

        let retention = self.config.history_retention;
        while history
            .front()
            .is_some_and(|e| now.duration_since(e.timestamp) > retention)
        {
            history.pop_front();
        }

        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
