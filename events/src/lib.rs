//! Event system infrastructure for the shelter platform.
//!
//! This crate decouples the domain layer from the real-time broadcast subsystem.
//! The domain layer emits a [`DomainEvent`] through an [`EventSender`] after every
//! successful mutation and returns immediately; a single broadcast worker drains the
//! queue and runs every registered [`EventHandler`] in emission order.
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Runs events through the registered handlers
//! - **EventSender**: Cheap, non-blocking handle the domain layer emits through
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies.

use async_trait::async_trait;
use log::*;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// The two kinds of animal the shelter keeps records for. Each kind has its own
/// statistics and its own real-time channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimalKind {
    Dog,
    Cat,
}

impl fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimalKind::Dog => write!(f, "dog"),
            AnimalKind::Cat => write!(f, "cat"),
        }
    }
}

/// Domain events that represent business-level changes in the system.
/// These events are emitted only after the change has been committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A new dog or cat record was stored.
    AnimalCreated { kind: AnimalKind, id: Id },
    /// One or more fields of an existing record changed.
    AnimalUpdated { kind: AnimalKind, id: Id },
    /// The record was removed.
    AnimalDeleted { kind: AnimalKind, id: Id },
}

impl DomainEvent {
    pub fn kind(&self) -> AnimalKind {
        match self {
            DomainEvent::AnimalCreated { kind, .. }
            | DomainEvent::AnimalUpdated { kind, .. }
            | DomainEvent::AnimalDeleted { kind, .. } => *kind,
        }
    }

    pub fn animal_id(&self) -> Id {
        match self {
            DomainEvent::AnimalCreated { id, .. }
            | DomainEvent::AnimalUpdated { id, .. }
            | DomainEvent::AnimalDeleted { id, .. } => *id,
        }
    }
}

/// Error type handlers report back to the broadcast worker.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc. A returned error is logged by the worker and
/// never reaches the request that caused the event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError>;
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// If a handler errors we log it and continue with remaining handlers.
    pub async fn publish(&self, event: &DomainEvent) {
        for handler in self.handlers.iter() {
            if let Err(e) = handler.handle(event).await {
                error!("Event handler failed for {event:?}: {e}");
            }
        }
    }

    /// Drains `receiver` until every sender is dropped, publishing one event at a time.
    ///
    /// Running a single instance of this loop is what orders broadcasts: an event is
    /// fully handled before the next one is looked at.
    pub async fn run(self, mut receiver: mpsc::UnboundedReceiver<DomainEvent>) {
        debug!("Broadcast worker started");
        while let Some(event) = receiver.recv().await {
            trace!("Broadcast worker handling {event:?}");
            self.publish(&event).await;
        }
        debug!("Broadcast worker stopped: all event senders dropped");
    }

    /// Spawns the broadcast worker on the current runtime.
    pub fn spawn_worker(self) -> (EventSender, JoinHandle<()>) {
        let (sender, receiver) = EventSender::channel();
        let handle = tokio::spawn(self.run(receiver));
        (sender, handle)
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

/// Enqueues domain events for the broadcast worker.
///
/// Sending never waits on the worker, so emitting an event cannot delay an HTTP response.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl EventSender {
    /// Creates a sender together with the receiving end a worker drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, event: DomainEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("Broadcast worker is gone, dropping event {:?}", e.0);
        }
    }
}
